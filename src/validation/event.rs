use tracing::debug;

use super::{normalize_date, normalize_time, required, required_list, slugify};
use crate::error::{Error, Result};
use crate::models::Event;

/// Runs the event save pipeline: required fields, slug, date, time.
///
/// `previous` is the stored version of the record, `None` for a new one. The
/// slug is only rederived when the record is new or its title changed. The
/// input is consumed so a failure leaves no half-normalized record behind.
pub fn normalize_event(mut event: Event, previous: Option<&Event>) -> Result<Event> {
    event.title = required("Title", &event.title)?;
    event.description = required("Description", &event.description)?;
    event.overview = required("Overview", &event.overview)?;
    event.image = required("Image", &event.image)?;
    event.venue = required("Venue", &event.venue)?;
    event.location = required("Location", &event.location)?;
    event.date = required("Date", &event.date)?;
    event.time = required("Time", &event.time)?;
    event.mode = required("Mode", &event.mode)?;
    event.audience = required("Audience", &event.audience)?;
    event.organizer = required("Organizer", &event.organizer)?;
    event.agenda = required_list("agenda", &event.agenda)?;
    event.tags = required_list("tag", &event.tags)?;

    let title_changed = previous.map_or(true, |prev| prev.title != event.title);
    if title_changed {
        let slug = slugify(&event.title);
        if slug.is_empty() {
            return Err(Error::validation(
                "Title must contain at least one letter or digit",
            ));
        }
        debug!("Derived slug '{}' for event {}", slug, event.id);
        event.slug = slug;
    } else if let Some(prev) = previous {
        event.slug = prev.slug.clone();
    }

    event.date = normalize_date(&event.date)?;
    event.time = normalize_time(&event.time)?;

    Ok(event)
}
