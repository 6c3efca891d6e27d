//! Event types for calendar sessions.
//!
//! This module provides the types shared by every layer:
//! - [`EventId`]: the canonical identifier assigned by the backend
//! - [`CalendarEvent`]: a stored session, identified by its [`EventId`] alone
//! - [`EventPayload`]: the mutable fields sent to the backend on create and update

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Wire format for event dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for event start times.
pub const TIME_FORMAT: &str = "%H:%M";

/// The canonical identifier of a stored event.
///
/// Assigned by the backend at creation and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates an identifier from a backend-provided string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The fields of an event as submitted to the backend.
///
/// Updates use full-replace semantics: every field of the stored record is
/// overwritten by the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub participants: Vec<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Length of the session in hours.
    pub duration: f64,
    #[serde(default)]
    pub session_notes: String,
}

impl EventPayload {
    /// Returns the payload with its date replaced.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// A calendar event as stored by the backend.
///
/// Two events are equal when their identifiers are equal, whatever their
/// other fields hold. Use [`CalendarEvent::same_fields`] to compare content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_notes: Option<String>,
}

impl CalendarEvent {
    /// Builds a stored event from a payload and its assigned identifier.
    ///
    /// Empty session notes are stored as absent.
    pub fn from_payload(id: impl Into<EventId>, payload: EventPayload) -> Self {
        Self {
            id: id.into(),
            title: payload.title,
            description: payload.description,
            participants: payload.participants,
            date: payload.date,
            time: payload.time,
            duration: payload.duration,
            session_notes: Some(payload.session_notes).filter(|notes| !notes.is_empty()),
        }
    }

    /// Returns the mutable fields of this event.
    pub fn to_payload(&self) -> EventPayload {
        EventPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            participants: self.participants.clone(),
            date: self.date,
            time: self.time,
            duration: self.duration,
            session_notes: self.session_notes.clone().unwrap_or_default(),
        }
    }

    /// Returns true if both events carry the same field values, ignoring identity.
    pub fn same_fields(&self, other: &CalendarEvent) -> bool {
        self.to_payload() == other.to_payload()
    }
}

impl PartialEq for CalendarEvent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CalendarEvent {}

impl Hash for CalendarEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parses a clock time, accepting `HH:MM` and `HH:MM:SS`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Serde adapter storing times as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(super::TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time `{raw}`, expected HH:MM")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> EventPayload {
        EventPayload {
            title: "Session A".to_string(),
            description: "intro".to_string(),
            participants: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration: 1.5,
            session_notes: String::new(),
        }
    }

    #[test]
    fn identity_is_by_id_only() {
        let a = CalendarEvent::from_payload("e1", payload());
        let mut b = a.clone();
        b.title = "Renamed".to_string();

        assert_eq!(a, b);
        assert!(!a.same_fields(&b));

        let c = CalendarEvent::from_payload("e2", payload());
        assert_ne!(a, c);
        assert!(a.same_fields(&c));
    }

    #[test]
    fn empty_notes_are_stored_as_absent() {
        let event = CalendarEvent::from_payload("e1", payload());
        assert!(event.session_notes.is_none());
        assert_eq!(event.to_payload().session_notes, "");

        let mut with_notes = payload();
        with_notes.session_notes = "went well".to_string();
        let event = CalendarEvent::from_payload("e1", with_notes);
        assert_eq!(event.session_notes.as_deref(), Some("went well"));
    }

    #[test]
    fn payload_wire_format() {
        insta::assert_json_snapshot!(payload(), @r#"
        {
          "title": "Session A",
          "description": "intro",
          "participants": [
            "a@x.com",
            "b@x.com"
          ],
          "date": "2024-05-01",
          "time": "10:00",
          "duration": 1.5,
          "sessionNotes": ""
        }
        "#);
    }

    #[test]
    fn event_deserializes_seconds_in_time() {
        let json = r#"{
            "id": "e1",
            "title": "T",
            "description": "D",
            "date": "2024-05-01",
            "time": "09:30:00",
            "duration": 2
        }"#;
        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(event.participants.is_empty());
        assert_eq!(event.duration, 2.0);
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_date("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(parse_date("05/01/2024").is_none());
        assert_eq!(parse_time(" 10:00 "), NaiveTime::from_hms_opt(10, 0, 0));
        assert!(parse_time("25:00").is_none());
        assert!(parse_time("ten").is_none());
    }

    #[test]
    fn event_id_conversions() {
        let id = EventId::from("abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(EventId::from("abc".to_string()), id);
    }
}
