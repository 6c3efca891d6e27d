//! Sequenced event list state.
//!
//! Every read takes a [`ReadTicket`] before it is issued. A response is only
//! applied when no newer read has been applied yet, so a slow response can
//! never overwrite fresher data.

use evallo_core::{CalendarEvent, EventId};
use serde::Serialize;

/// Lifecycle of the event list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Sequence number of one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadTicket(u64);

impl ReadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// The canonical event list in backend order.
#[derive(Debug, Default)]
pub struct EventList {
    events: Vec<CalendarEvent>,
    phase: SyncPhase,
    issued: u64,
    applied: u64,
}

impl EventList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new read and enters `Loading`.
    pub fn begin_read(&mut self) -> ReadTicket {
        self.issued += 1;
        self.phase = SyncPhase::Loading;
        ReadTicket(self.issued)
    }

    fn is_stale(&self, ticket: ReadTicket) -> bool {
        ticket.0 <= self.applied
    }

    /// Replaces the list with a read result.
    ///
    /// Returns `false` when the response is stale and was discarded.
    pub fn apply(&mut self, ticket: ReadTicket, events: Vec<CalendarEvent>) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        self.applied = ticket.0;
        self.events = events;
        if ticket.0 == self.issued {
            self.phase = SyncPhase::Loaded;
        }
        true
    }

    /// Records a failed read. The list keeps its last good value.
    ///
    /// Returns `false` when the failure is stale and was ignored.
    pub fn fail(&mut self, ticket: ReadTicket) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        if ticket.0 == self.issued {
            self.phase = SyncPhase::Error;
        }
        true
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn find(&self, id: &EventId) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| &event.id == id)
    }
}
