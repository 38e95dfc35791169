use bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::db::EventStore;
use crate::error::{Error, Result};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .expect("valid email regex")
});

/// Trims and lowercases an email, then checks it has a `local@domain.tld` shape.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(Error::validation("Email is required"));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(Error::validation("Please provide a valid email address"));
    }
    Ok(email)
}

pub fn parse_event_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| Error::validation("Invalid event id"))
}

/// Confirms the referenced event is present. Lookup failures are reported as
/// validation errors so the booking is never written on an unverified reference.
pub async fn check_event_reference<S>(events: &S, event_id: &ObjectId) -> Result<()>
where
    S: EventStore + ?Sized,
{
    match events.event_exists(event_id).await {
        Ok(true) => {
            debug!("Referenced event {} exists", event_id);
            Ok(())
        }
        Ok(false) => Err(Error::validation("Referenced event does not exist")),
        Err(err) => {
            warn!("Event lookup for {} failed: {}", event_id, err);
            Err(Error::validation(format!("Event lookup failed: {}", err)))
        }
    }
}
