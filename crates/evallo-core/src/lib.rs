//! Core types: calendar events, form drafts, validation, tracing

pub mod draft;
pub mod event;
pub mod tracing;
pub mod validate;

pub use draft::EventDraft;
pub use event::{CalendarEvent, EventId, EventPayload, parse_date, parse_time};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use validate::{
    Field, FieldError, ValidationErrors, check_event, join_participants, parse_duration,
    split_participants,
};
