//! Editable form fields for an event.

use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventPayload, TIME_FORMAT, parse_date, parse_time};
use crate::validate::{Field, FieldError, ValidationErrors, join_participants, parse_duration, split_participants};

/// The raw text of every event field, as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    /// Comma-separated participant list.
    pub participants: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub session_notes: String,
}

impl EventDraft {
    /// Seeds a draft from a stored event.
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            participants: join_participants(&event.participants),
            date: event.date.to_string(),
            time: event.time.format(TIME_FORMAT).to_string(),
            duration: if event.duration == 0.0 {
                String::new()
            } else {
                event.duration.to_string()
            },
            session_notes: event.session_notes.clone().unwrap_or_default(),
        }
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Participants => &self.participants,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Duration => &self.duration,
            Field::SessionNotes => &self.session_notes,
        }
    }

    /// Replaces the raw value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Participants => &mut self.participants,
            Field::Date => &mut self.date,
            Field::Time => &mut self.time,
            Field::Duration => &mut self.duration,
            Field::SessionNotes => &mut self.session_notes,
        };
        *slot = value.into();
    }

    /// Validates the draft and converts it into a payload.
    ///
    /// Every required field must be non-blank, the date must be `YYYY-MM-DD`,
    /// the time `HH:MM` and the duration a positive number of hours. All
    /// failures are reported together.
    pub fn validate(&self) -> Result<EventPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for field in Field::ALL {
            if field.is_required() && self.get(field).trim().is_empty() {
                errors.push(FieldError::Missing(field));
            }
        }

        let date = match self.date.trim() {
            "" => None,
            raw => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.push(FieldError::invalid(Field::Date, "expected YYYY-MM-DD"));
                }
                parsed
            }
        };

        let time = match self.time.trim() {
            "" => None,
            raw => {
                let parsed = parse_time(raw);
                if parsed.is_none() {
                    errors.push(FieldError::invalid(Field::Time, "expected HH:MM"));
                }
                parsed
            }
        };

        let duration = match self.duration.trim() {
            "" => None,
            raw => parse_duration(raw).map_err(|e| errors.push(e)).ok(),
        };

        match (date, time, duration) {
            (Some(date), Some(time), Some(duration)) if errors.is_empty() => Ok(EventPayload {
                title: self.title.clone(),
                description: self.description.clone(),
                participants: split_participants(&self.participants),
                date,
                time,
                duration,
                session_notes: self.session_notes.clone(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn filled() -> EventDraft {
        EventDraft {
            title: "Session A".to_string(),
            description: "intro".to_string(),
            participants: "a@x.com, b@x.com".to_string(),
            date: "2024-05-01".to_string(),
            time: "10:00".to_string(),
            duration: "1.5".to_string(),
            session_notes: String::new(),
        }
    }

    #[test]
    fn valid_draft_converts() {
        let payload = filled().validate().unwrap();
        assert_eq!(payload.title, "Session A");
        assert_eq!(payload.participants, vec!["a@x.com", "b@x.com"]);
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(payload.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(payload.duration, 1.5);
        assert_eq!(payload.session_notes, "");
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let errors = EventDraft::default().validate().unwrap_err();
        assert_eq!(errors.errors().len(), 5);
        for field in [Field::Title, Field::Description, Field::Date, Field::Time, Field::Duration] {
            assert!(errors.errors().contains(&FieldError::Missing(field)), "{field}");
        }
    }

    #[test]
    fn whitespace_counts_as_empty() {
        let mut draft = filled();
        draft.title = "   ".to_string();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.errors(), &[FieldError::Missing(Field::Title)]);
    }

    #[test]
    fn non_numeric_duration_is_rejected() {
        let mut draft = filled();
        draft.duration = "an hour".to_string();
        let errors = draft.validate().unwrap_err();
        assert!(errors.has(Field::Duration));
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn malformed_date_and_time_are_rejected() {
        let mut draft = filled();
        draft.date = "01/05/2024".to_string();
        draft.time = "10am".to_string();
        let errors = draft.validate().unwrap_err();
        assert!(errors.has(Field::Date));
        assert!(errors.has(Field::Time));
    }

    #[test]
    fn empty_participants_keep_single_empty_entry() {
        let mut draft = filled();
        draft.participants = String::new();
        let payload = draft.validate().unwrap();
        assert_eq!(payload.participants, vec![String::new()]);
    }

    #[test]
    fn seeds_from_event() {
        let mut payload = filled().validate().unwrap();
        payload.session_notes = "notes".to_string();
        let event = CalendarEvent::from_payload("e1", payload);

        let draft = EventDraft::from_event(&event);
        assert_eq!(draft.participants, "a@x.com, b@x.com");
        assert_eq!(draft.date, "2024-05-01");
        assert_eq!(draft.time, "10:00");
        assert_eq!(draft.duration, "1.5");
        assert_eq!(draft.session_notes, "notes");
        assert_eq!(draft.validate().unwrap(), event.to_payload());
    }

    #[test]
    fn whole_hour_duration_seeds_without_fraction() {
        let mut payload = filled().validate().unwrap();
        payload.duration = 2.0;
        let draft = EventDraft::from_event(&CalendarEvent::from_payload("e1", payload));
        assert_eq!(draft.duration, "2");
    }

    #[test]
    fn get_and_set_by_field() {
        let mut draft = EventDraft::default();
        draft.set(Field::SessionNotes, "n");
        draft.set(Field::Duration, "3");
        assert_eq!(draft.get(Field::SessionNotes), "n");
        assert_eq!(draft.get(Field::Duration), "3");
    }
}
