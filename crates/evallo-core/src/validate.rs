//! Schema validation for event drafts and stored events.
//!
//! [`EventDraft::validate`](crate::EventDraft::validate) runs before every
//! mutation; [`check_event`] guards ingestion so that every listed event
//! satisfies the field constraints.

use std::fmt;

use thiserror::Error;

use crate::event::EventPayload;

/// A field of the event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Participants,
    Date,
    Time,
    Duration,
    SessionNotes,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Description,
        Field::Participants,
        Field::Date,
        Field::Time,
        Field::Duration,
        Field::SessionNotes,
    ];

    /// Returns the wire name of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Participants => "participants",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::SessionNotes => "sessionNotes",
        }
    }

    /// Returns true if a submission must provide a value for this field.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Participants | Self::SessionNotes)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required field was left empty.
    #[error("{0} is required")]
    Missing(Field),

    /// A field holds a value that cannot be used.
    #[error("{field} is invalid: {reason}")]
    Invalid { field: Field, reason: String },
}

impl FieldError {
    /// Creates an invalid-value error.
    pub fn invalid(field: Field, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the field this error refers to.
    pub fn field(&self) -> Field {
        match self {
            Self::Missing(field) => *field,
            Self::Invalid { field, .. } => *field,
        }
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid event: {}", summary(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Records a field error.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Returns true if no error was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the recorded errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if any error refers to `field`.
    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// Converts into `Ok(value)` when empty, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Splits a comma-separated participants field into trimmed entries.
///
/// An empty input yields a single empty entry, not an empty list.
pub fn split_participants(raw: &str) -> Vec<String> {
    raw.split(',').map(|p| p.trim().to_string()).collect()
}

/// Joins participants back into the comma-separated form field.
pub fn join_participants(participants: &[String]) -> String {
    participants.join(", ")
}

/// Parses a duration in hours, rejecting non-numeric and non-positive input.
pub fn parse_duration(raw: &str) -> Result<f64, FieldError> {
    let hours: f64 = raw
        .trim()
        .parse()
        .map_err(|_| FieldError::invalid(Field::Duration, format!("`{}` is not a number", raw.trim())))?;
    check_duration(hours)?;
    Ok(hours)
}

fn check_duration(hours: f64) -> Result<(), FieldError> {
    if !hours.is_finite() {
        return Err(FieldError::invalid(Field::Duration, "must be a finite number"));
    }
    if hours <= 0.0 {
        return Err(FieldError::invalid(Field::Duration, "must be positive"));
    }
    Ok(())
}

/// Checks the constraints every stored event must satisfy.
pub fn check_event(payload: &EventPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if payload.title.trim().is_empty() {
        errors.push(FieldError::Missing(Field::Title));
    }
    if payload.description.trim().is_empty() {
        errors.push(FieldError::Missing(Field::Description));
    }
    if let Err(e) = check_duration(payload.duration) {
        errors.push(e);
    }
    errors.into_result(())
}
