//! RawEvent to CalendarEvent conversion.
//!
//! Normalization happens at the ingestion boundary, right after a response
//! is parsed. Downstream code only ever sees [`CalendarEvent`] values with
//! a canonical identifier and valid fields.

use evallo_core::{CalendarEvent, EventId, EventPayload, check_event, parse_date, parse_time};
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::raw_event::RawEvent;

/// Converts a [`RawEvent`] into a [`CalendarEvent`].
///
/// Participants are trimmed. Fails with an invalid-response error when the
/// record has no identifier or violates the event field constraints.
pub fn normalize_event(raw: RawEvent) -> ApiResult<CalendarEvent> {
    let id = raw
        .canonical_id()
        .map(EventId::from)
        .ok_or_else(|| ApiError::invalid_response("event has neither `id` nor `_id`"))?;

    let date = raw
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| ApiError::invalid_response(format!("event {} has no valid date", id)))?;
    let time = raw
        .time
        .as_deref()
        .and_then(parse_time)
        .ok_or_else(|| ApiError::invalid_response(format!("event {} has no valid time", id)))?;

    let payload = EventPayload {
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        participants: raw
            .participants
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.trim().to_string())
            .collect(),
        date,
        time,
        duration: raw.duration.unwrap_or_default(),
        session_notes: raw.session_notes.unwrap_or_default(),
    };

    check_event(&payload)
        .map_err(|e| ApiError::invalid_response(format!("event {}: {}", id, e)).with_source(e))?;

    Ok(CalendarEvent::from_payload(id, payload))
}

/// Parses one list item into a [`RawEvent`] and normalizes it.
pub fn normalize_value(value: Value) -> ApiResult<CalendarEvent> {
    let raw: RawEvent = serde_json::from_value(value).map_err(|e| {
        ApiError::invalid_response(format!("malformed event record: {}", e)).with_source(e)
    })?;
    normalize_event(raw)
}

/// Normalizes a list, dropping (and logging) items that do not normalize.
///
/// Items are parsed one at a time so a single mistyped record never costs
/// the rest of the list.
pub fn normalize_events(values: Vec<Value>) -> Vec<CalendarEvent> {
    values
        .into_iter()
        .filter_map(|value| {
            normalize_value(value)
                .map_err(|e| warn!("dropping event from list: {}", e.message()))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorCode;
    use serde_json::json;

    fn raw(id: Option<&str>, legacy_id: Option<&str>) -> RawEvent {
        RawEvent {
            id: id.map(String::from),
            legacy_id: legacy_id.map(String::from),
            title: Some("Session".to_string()),
            description: Some("intro".to_string()),
            participants: Some(vec![" a@x.com ".to_string(), "b@x.com".to_string()]),
            date: Some("2024-05-01".to_string()),
            time: Some("10:00".to_string()),
            duration: Some(1.0),
            session_notes: None,
        }
    }

    #[test]
    fn canonical_id_from_either_field() {
        assert_eq!(normalize_event(raw(Some("e1"), None)).unwrap().id.as_str(), "e1");
        assert_eq!(normalize_event(raw(None, Some("m1"))).unwrap().id.as_str(), "m1");
        assert_eq!(
            normalize_event(raw(Some("e1"), Some("m1"))).unwrap().id.as_str(),
            "e1"
        );
    }

    #[test]
    fn participants_are_trimmed() {
        let event = normalize_event(raw(Some("e1"), None)).unwrap();
        assert_eq!(event.participants, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn missing_id_is_invalid_response() {
        let err = normalize_event(raw(None, None)).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::InvalidResponse);
    }

    #[test]
    fn constraint_violations_are_rejected() {
        let mut bad = raw(Some("e1"), None);
        bad.title = Some(String::new());
        assert!(normalize_event(bad).is_err());

        let mut bad = raw(Some("e2"), None);
        bad.duration = None;
        assert!(normalize_event(bad).is_err());

        let mut bad = raw(Some("e3"), None);
        bad.time = Some("noon".to_string());
        assert!(normalize_event(bad).is_err());
    }

    fn item(id: &str) -> Value {
        json!({
            "_id": id,
            "title": "Session",
            "description": "intro",
            "participants": ["a@x.com"],
            "date": "2024-05-01",
            "time": "10:00",
            "duration": 1.0
        })
    }

    #[test]
    fn list_keeps_order_and_drops_invalid() {
        let mut broken = item("e2");
        broken["date"] = Value::Null;

        let events = normalize_events(vec![item("e3"), broken, item("e1")]);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e3", "e1"]);
    }

    #[test]
    fn mistyped_items_are_dropped_alone() {
        let mut text_duration = item("e2");
        text_duration["duration"] = json!("1.5");
        let mut scalar_participants = item("e3");
        scalar_participants["participants"] = json!("a@x.com");

        let events = normalize_events(vec![
            item("e1"),
            text_duration,
            scalar_participants,
            json!("not an object"),
        ]);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1"]);
    }

    #[test]
    fn numeric_identifier_is_kept() {
        let mut numeric = item("unused");
        numeric["_id"] = json!(42);
        assert_eq!(normalize_value(numeric).unwrap().id.as_str(), "42");
    }
}
