//! In-memory event store.
//!
//! [`MemoryStore`] follows the same contract as the remote API: it assigns
//! identifiers, rejects invalid payloads, reports unknown identifiers and
//! keeps insertion order. It records every call and can be told to fail
//! the next call of a given operation, which makes it the test double for
//! the synchronization controller.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use evallo_core::{CalendarEvent, EventId, EventPayload, check_event};
use tracing::debug;

use crate::error::{ApiError, ApiErrorCode, ApiResult};
use crate::store::{BoxFuture, EventStore, Operation, ReadFilter};

/// A call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create(EventPayload),
    Read(ReadFilter),
    Update(EventId, EventPayload),
    Delete(EventId),
}

impl StoreCall {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Create(_) => Operation::Create,
            Self::Read(_) => Operation::Read,
            Self::Update(..) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<CalendarEvent>,
    next_id: u64,
    calls: Vec<StoreCall>,
    failures: HashMap<Operation, (ApiErrorCode, String)>,
}

/// An [`EventStore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with events, keeping their identifiers.
    pub fn with_events(events: impl IntoIterator<Item = CalendarEvent>) -> Self {
        let store = Self::new();
        store.lock().events.extend(events);
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next call of `operation` fail with the given code.
    pub fn fail_next(&self, operation: Operation, code: ApiErrorCode) {
        self.lock()
            .failures
            .insert(operation, (code, format!("injected {} failure", operation)));
    }

    /// Returns a snapshot of the stored events.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.lock().events.clone()
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Returns the operations received so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.lock().calls.iter().map(StoreCall::operation).collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Records a call and returns the injected failure for it, if any.
    fn begin(inner: &mut Inner, call: StoreCall) -> ApiResult<()> {
        let operation = call.operation();
        debug!(%operation, "memory store call");
        inner.calls.push(call);
        match inner.failures.remove(&operation) {
            Some((code, message)) => Err(ApiError::new(code, message).with_operation(operation)),
            None => Ok(()),
        }
    }

    fn validate(payload: &EventPayload, operation: Operation) -> ApiResult<()> {
        check_event(payload).map_err(|e| {
            ApiError::validation(e.to_string())
                .with_operation(operation)
                .with_source(e)
        })
    }

    fn create_now(&self, payload: EventPayload) -> ApiResult<CalendarEvent> {
        let mut inner = self.lock();
        Self::begin(&mut inner, StoreCall::Create(payload.clone()))?;
        Self::validate(&payload, Operation::Create)?;

        inner.next_id += 1;
        let event = CalendarEvent::from_payload(format!("mem-{}", inner.next_id), payload);
        inner.events.push(event.clone());
        Ok(event)
    }

    fn read_now(&self, filter: ReadFilter) -> ApiResult<Vec<CalendarEvent>> {
        let mut inner = self.lock();
        Self::begin(&mut inner, StoreCall::Read(filter.clone()))?;
        Ok(inner
            .events
            .iter()
            .filter(|event| filter.matches(event.date))
            .cloned()
            .collect())
    }

    fn update_now(&self, id: EventId, payload: EventPayload) -> ApiResult<CalendarEvent> {
        let mut inner = self.lock();
        Self::begin(&mut inner, StoreCall::Update(id.clone(), payload.clone()))?;
        Self::validate(&payload, Operation::Update)?;

        let slot = inner
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| {
                ApiError::not_found(format!("no event {}", id)).with_operation(Operation::Update)
            })?;
        *slot = CalendarEvent::from_payload(id, payload);
        Ok(slot.clone())
    }

    fn delete_now(&self, id: EventId) -> ApiResult<()> {
        let mut inner = self.lock();
        Self::begin(&mut inner, StoreCall::Delete(id.clone()))?;

        let index = inner
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| {
                ApiError::not_found(format!("no event {}", id)).with_operation(Operation::Delete)
            })?;
        inner.events.remove(index);
        Ok(())
    }
}

impl EventStore for MemoryStore {
    fn create(&self, payload: EventPayload) -> BoxFuture<'_, ApiResult<CalendarEvent>> {
        let result = self.create_now(payload);
        Box::pin(async move { result })
    }

    fn read(&self, filter: ReadFilter) -> BoxFuture<'_, ApiResult<Vec<CalendarEvent>>> {
        let result = self.read_now(filter);
        Box::pin(async move { result })
    }

    fn update(
        &self,
        id: EventId,
        payload: EventPayload,
    ) -> BoxFuture<'_, ApiResult<CalendarEvent>> {
        let result = self.update_now(id, payload);
        Box::pin(async move { result })
    }

    fn delete(&self, id: EventId) -> BoxFuture<'_, ApiResult<()>> {
        let result = self.delete_now(id);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn payload(title: &str) -> EventPayload {
        EventPayload {
            title: title.to_string(),
            description: "d".to_string(),
            participants: vec![],
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration: 1.0,
            session_notes: String::new(),
        }
    }

    #[tokio::test]
    async fn assigns_identifiers_in_order() {
        let store = MemoryStore::new();
        let a = store.create(payload("a")).await.unwrap();
        let b = store.create(payload("b")).await.unwrap();
        assert_eq!(a.id.as_str(), "mem-1");
        assert_eq!(b.id.as_str(), "mem-2");

        let listed = store.read(ReadFilter::new()).await.unwrap();
        assert_eq!(listed, vec![a, b]);
    }

    #[tokio::test]
    async fn rejects_invalid_payload() {
        let store = MemoryStore::new();
        let err = store.create(payload("")).await.unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::ValidationError);
        assert!(store.events().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = MemoryStore::new();
        let id = EventId::from("missing");
        assert_eq!(
            store.update(id.clone(), payload("x")).await.unwrap_err().code(),
            ApiErrorCode::NotFound
        );
        assert_eq!(
            store.delete(id).await.unwrap_err().code(),
            ApiErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn injected_failure_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next(Operation::Read, ApiErrorCode::NetworkError);

        let err = store.read(ReadFilter::new()).await.unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::NetworkError);
        assert_eq!(err.operation(), Some(Operation::Read));
        assert!(store.read(ReadFilter::new()).await.is_ok());
        assert_eq!(store.operations(), vec![Operation::Read, Operation::Read]);
    }

    #[tokio::test]
    async fn read_applies_filter() {
        let store = MemoryStore::new();
        store.create(payload("may")).await.unwrap();
        let mut june = payload("june");
        june.date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        store.create(june).await.unwrap();

        let filter = ReadFilter::new().with_from(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let listed = store.read(filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "june");
    }
}
