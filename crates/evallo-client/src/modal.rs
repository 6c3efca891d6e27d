//! Create/edit modal state.

use chrono::NaiveDate;
use evallo_core::CalendarEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit,
}

impl ModalMode {
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Create => "Create New Event",
            Self::Edit => "Update Event",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Create => "Create Event",
            Self::Edit => "Update Event",
        }
    }

    /// Only stored events can be deleted.
    pub fn can_delete(&self) -> bool {
        matches!(self, Self::Edit)
    }
}

/// The modal, if open, and what it was opened for.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    #[default]
    Closed,
    /// Opened from a date click.
    Create { selected_date: NaiveDate },
    /// Opened from an event click, holding a copy of the event.
    Edit { initial: CalendarEvent },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn mode(&self) -> Option<ModalMode> {
        match self {
            Self::Closed => None,
            Self::Create { .. } => Some(ModalMode::Create),
            Self::Edit { .. } => Some(ModalMode::Edit),
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Create { selected_date } => Some(*selected_date),
            _ => None,
        }
    }

    pub fn initial(&self) -> Option<&CalendarEvent> {
        match self {
            Self::Edit { initial } => Some(initial),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_by_default() {
        let modal = ModalState::default();
        assert!(!modal.is_open());
        assert_eq!(modal.mode(), None);
    }

    #[test]
    fn create_mode() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let modal = ModalState::Create {
            selected_date: date,
        };
        let mode = modal.mode().unwrap();
        assert_eq!(mode.heading(), "Create New Event");
        assert_eq!(mode.submit_label(), "Create Event");
        assert!(!mode.can_delete());
        assert_eq!(modal.selected_date(), Some(date));
        assert!(modal.initial().is_none());
    }

    #[test]
    fn edit_mode_labels() {
        assert_eq!(ModalMode::Edit.heading(), "Update Event");
        assert_eq!(ModalMode::Edit.submit_label(), "Update Event");
        assert!(ModalMode::Edit.can_delete());
    }
}
