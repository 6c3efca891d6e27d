//! EventStore trait definition.
//!
//! [`EventStore`] is the seam between the synchronization controller and
//! whatever holds the canonical event collection: the remote API
//! ([`ApiClient`](crate::ApiClient)) or the in-memory
//! [`MemoryStore`](crate::MemoryStore).

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use evallo_core::{CalendarEvent, EventId, EventPayload};

use crate::error::ApiResult;

/// The four operations of an event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional bounds for a read. The default filter selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadFilter {
    /// First date to include.
    pub from: Option<NaiveDate>,
    /// Last date to include.
    pub to: Option<NaiveDate>,
}

impl ReadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the lower bound.
    pub fn with_from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    /// Builder method to set the upper bound.
    pub fn with_to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    /// Returns true if no bound is set.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true if `date` falls within the bounds.
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Returns the bounds as query parameters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }
        pairs
    }
}

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The canonical store of calendar events.
///
/// Every event is created, updated and destroyed through these four
/// operations. Implementations make a single attempt per call; failures are
/// returned to the caller unchanged.
pub trait EventStore: Send + Sync {
    /// Creates an event and returns it with its assigned identifier.
    fn create(&self, payload: EventPayload) -> BoxFuture<'_, ApiResult<CalendarEvent>>;

    /// Returns the full current list, in store order.
    fn read(&self, filter: ReadFilter) -> BoxFuture<'_, ApiResult<Vec<CalendarEvent>>>;

    /// Overwrites every field of the event with the payload.
    fn update(&self, id: EventId, payload: EventPayload)
    -> BoxFuture<'_, ApiResult<CalendarEvent>>;

    /// Removes the event.
    fn delete(&self, id: EventId) -> BoxFuture<'_, ApiResult<()>>;
}
