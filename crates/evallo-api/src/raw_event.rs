//! Event records as the backend sends them.
//!
//! The backend has historically exposed the identifier either as `id` or
//! as `_id`; [`RawEvent`] accepts both and [`normalize`](crate::normalize)
//! settles on one canonical identifier.

use serde::{Deserialize, Deserializer};

/// An event body before normalization. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "string_or_number")]
    pub legacy_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub participants: Option<Vec<String>>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<f64>,
    pub session_notes: Option<String>,
}

impl RawEvent {
    /// Returns the first present, non-empty identifier among `id` and `_id`.
    pub fn canonical_id(&self) -> Option<&str> {
        [self.id.as_deref(), self.legacy_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }
}

/// Accepts identifiers sent as JSON numbers as well as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_id_over_legacy_id() {
        let raw: RawEvent = serde_json::from_str(r#"{"id": "a", "_id": "b"}"#).unwrap();
        assert_eq!(raw.canonical_id(), Some("a"));
    }

    #[test]
    fn falls_back_to_legacy_id() {
        let raw: RawEvent = serde_json::from_str(r#"{"_id": "65f0c2"}"#).unwrap();
        assert_eq!(raw.canonical_id(), Some("65f0c2"));

        let raw: RawEvent = serde_json::from_str(r#"{"id": "", "_id": "b"}"#).unwrap();
        assert_eq!(raw.canonical_id(), Some("b"));
    }

    #[test]
    fn numeric_identifier_becomes_text() {
        let raw: RawEvent = serde_json::from_str(r#"{"_id": 42}"#).unwrap();
        assert_eq!(raw.canonical_id(), Some("42"));
    }

    #[test]
    fn no_identifier() {
        let raw: RawEvent = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(raw.canonical_id(), None);
    }

    #[test]
    fn parses_full_record_and_ignores_unknown_fields() {
        let json = r#"{
            "_id": "65f0c2",
            "title": "Session A",
            "description": "intro",
            "participants": ["a@x.com"],
            "date": "2024-05-01",
            "time": "10:00",
            "duration": 1.5,
            "sessionNotes": "n",
            "userId": "u1",
            "__v": 0
        }"#;
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Session A"));
        assert_eq!(raw.participants.as_ref().map(Vec::len), Some(1));
        assert_eq!(raw.duration, Some(1.5));
        assert_eq!(raw.session_notes.as_deref(), Some("n"));
    }
}
