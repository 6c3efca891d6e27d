//! The event form.
//!
//! Holds the text of each field while the modal is open. It never talks to
//! the backend: submitting only validates and produces a payload.

use evallo_core::{EventDraft, EventPayload, Field, ValidationErrors};

use crate::modal::ModalState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    draft: EventDraft,
}

impl EventForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-seeds every field from the modal: from the event being edited,
    /// or cleared otherwise.
    pub fn seed(&mut self, modal: &ModalState) {
        self.draft = modal
            .initial()
            .map(EventDraft::from_event)
            .unwrap_or_default();
    }

    pub fn clear(&mut self) {
        self.draft = EventDraft::default();
    }

    pub fn get(&self, field: Field) -> &str {
        self.draft.get(field)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    /// Validates the fields into a payload.
    pub fn submit(&self) -> Result<EventPayload, ValidationErrors> {
        self.draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use evallo_core::CalendarEvent;

    fn stored() -> CalendarEvent {
        CalendarEvent::from_payload(
            "e1",
            EventPayload {
                title: "Review".to_string(),
                description: "weekly".to_string(),
                participants: vec!["a@x.com".to_string(), "b@x.com".to_string()],
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                duration: 2.0,
                session_notes: "notes".to_string(),
            },
        )
    }

    #[test]
    fn seeds_from_edited_event() {
        let mut form = EventForm::new();
        form.seed(&ModalState::Edit { initial: stored() });

        assert_eq!(form.get(Field::Title), "Review");
        assert_eq!(form.get(Field::Participants), "a@x.com, b@x.com");
        assert_eq!(form.get(Field::Time), "10:00");
        assert_eq!(form.get(Field::Duration), "2");
        assert_eq!(form.get(Field::SessionNotes), "notes");
    }

    #[test]
    fn create_clears_previous_values() {
        let mut form = EventForm::new();
        form.seed(&ModalState::Edit { initial: stored() });
        form.seed(&ModalState::Create {
            selected_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        });
        assert_eq!(form.draft(), &EventDraft::default());
    }

    #[test]
    fn unchanged_edit_submits_stored_fields() {
        let mut form = EventForm::new();
        let event = stored();
        form.seed(&ModalState::Edit {
            initial: event.clone(),
        });
        assert_eq!(form.submit().unwrap(), event.to_payload());
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let mut form = EventForm::new();
        form.seed(&ModalState::Edit { initial: stored() });
        form.set(Field::Description, "   ");

        let errors = form.submit().unwrap_err();
        assert!(errors.has(Field::Description));
    }
}
