use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub title: String,

    pub slug: String,

    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,

    /// Calendar date, `YYYY-MM-DD` once normalized.
    pub date: String,

    /// 24-hour `HH:MM` once normalized.
    pub time: String,

    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    #[serde(default)]
    pub agenda: Vec<String>,
    pub organizer: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Event {
    /// Builds an unsaved record. The slug is empty until the save pipeline derives it.
    pub fn new(create: CreateEvent) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            title: create.title,
            slug: String::new(),
            description: create.description,
            overview: create.overview,
            image: create.image,
            venue: create.venue,
            location: create.location,
            date: create.date,
            time: create.time,
            mode: create.mode,
            audience: create.audience,
            agenda: create.agenda,
            organizer: create.organizer,
            tags: create.tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateEvent) {
        macro_rules! assign {
            ($($field:ident),*) => {
                $(if let Some(value) = update.$field {
                    self.$field = value;
                })*
            };
        }

        assign!(
            title,
            description,
            overview,
            image,
            venue,
            location,
            date,
            time,
            mode,
            audience,
            agenda,
            organizer,
            tags
        );
    }

    pub fn shares_tag_with(&self, other: &Event) -> bool {
        self.tags.iter().any(|tag| other.tags.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_create() -> CreateEvent {
        CreateEvent {
            title: "Rust Meetup".to_string(),
            description: "Monthly meetup".to_string(),
            overview: "Talks and pizza".to_string(),
            image: "/images/rust.png".to_string(),
            venue: "Hall A".to_string(),
            location: "Berlin".to_string(),
            date: "2025-03-05".to_string(),
            time: "18:00".to_string(),
            mode: "offline".to_string(),
            audience: "Developers".to_string(),
            agenda: vec!["Intro".to_string()],
            organizer: "Rust Berlin".to_string(),
            tags: vec!["rust".to_string()],
        }
    }

    #[test]
    fn test_apply_update_only_touches_given_fields() {
        let mut event = Event::new(sample_create());
        event.apply_update(UpdateEvent {
            venue: Some("Hall B".to_string()),
            tags: Some(vec!["systems".to_string()]),
            ..Default::default()
        });

        assert_eq!(event.venue, "Hall B");
        assert_eq!(event.tags, vec!["systems".to_string()]);
        assert_eq!(event.title, "Rust Meetup");
    }

    #[test]
    fn test_document_uses_camel_case_keys() {
        let event = Event::new(sample_create());
        let doc = bson::to_document(&event).unwrap();

        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("createdAt"));
        assert!(doc.get_datetime("updatedAt").is_ok());
    }

    #[test]
    fn test_shares_tag_with() {
        let a = Event::new(sample_create());
        let mut create = sample_create();
        create.tags = vec!["go".to_string(), "rust".to_string()];
        let b = Event::new(create);
        let mut create = sample_create();
        create.tags = vec!["go".to_string()];
        let c = Event::new(create);

        assert!(a.shares_tag_with(&b));
        assert!(!a.shares_tag_with(&c));
    }
}
