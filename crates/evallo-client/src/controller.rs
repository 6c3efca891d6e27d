//! Event synchronization controller.
//!
//! Owns the canonical event list and the modal. Every mutation is followed
//! by a full re-read of the list; nothing is updated locally ahead of the
//! backend. Failures are logged and turned into notifications, they never
//! escape the controller.
//!
//! ```text
//!  Idle ──mount──▶ Loading ──ok──▶ Loaded
//!                     │
//!                     └──err──▶ Error
//!
//!  date click ──▶ Create{date} ─┐
//!  event click ─▶ Edit{event} ──┼─ submit/delete ─▶ mutation ─▶ read ─▶ Closed ─▶ notify
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use evallo_api::{
    ApiErrorCode, ApiResult, BoxFuture, CredentialStore, EventStore, Operation, ReadFilter,
};
use evallo_core::{CalendarEvent, EventId, ValidationErrors};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::bootstrap::bootstrap;
use crate::form::EventForm;
use crate::list::{EventList, ReadTicket, SyncPhase};
use crate::modal::ModalState;
use crate::notify::{EVENTS_LOAD_FAILED, EVENTS_LOADED, Notification, Notifier};

/// Result of a submit or delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The backend accepted the mutation.
    Applied(Operation),
    /// The backend call failed.
    Failed(Operation, ApiErrorCode),
    /// The form did not validate; nothing was sent and the modal stays open.
    Rejected(ValidationErrors),
    /// There was nothing to act on, e.g. the modal was closed.
    Ignored,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// A read that has been issued but whose response is not applied yet.
///
/// The response future owns its store handle, so several reads can be in
/// flight at once and finish in any order.
pub struct PendingRead {
    ticket: ReadTicket,
    response: BoxFuture<'static, ApiResult<Vec<CalendarEvent>>>,
}

impl PendingRead {
    pub fn ticket(&self) -> ReadTicket {
        self.ticket
    }

    /// Waits for the backend response.
    pub async fn finish(self) -> CompletedRead {
        CompletedRead {
            ticket: self.ticket,
            result: self.response.await,
        }
    }
}

/// A read response waiting to be applied with
/// [`SyncController::complete_read`].
pub struct CompletedRead {
    ticket: ReadTicket,
    result: ApiResult<Vec<CalendarEvent>>,
}

/// What a submit targets, captured before the modal is closed.
enum Target {
    Create(NaiveDate),
    Update(EventId),
}

pub struct SyncController {
    store: Arc<dyn EventStore>,
    notifier: Arc<dyn Notifier>,
    credentials: Arc<dyn CredentialStore>,
    filter: ReadFilter,
    list: EventList,
    modal: ModalState,
    form: EventForm,
}

impl SyncController {
    pub fn new(
        store: Arc<dyn EventStore>,
        notifier: Arc<dyn Notifier>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            store,
            notifier,
            credentials,
            filter: ReadFilter::default(),
            list: EventList::new(),
            modal: ModalState::Closed,
            form: EventForm::new(),
        }
    }

    /// Builder: restrict every read to a date range.
    pub fn with_filter(mut self, filter: ReadFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn events(&self) -> &[CalendarEvent] {
        self.list.events()
    }

    pub fn phase(&self) -> SyncPhase {
        self.list.phase()
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn form(&self) -> &EventForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EventForm {
        &mut self.form
    }

    pub fn find(&self, id: &EventId) -> Option<&CalendarEvent> {
        self.list.find(id)
    }

    /// Bootstraps the login token from the page URL, then loads the list.
    pub async fn mount(&mut self, page_url: Option<&mut Url>) -> SyncPhase {
        if let Some(url) = page_url
            && let Err(e) = bootstrap(url, self.credentials.as_ref())
        {
            error!("failed to store login token: {}", e);
        }
        self.load(true).await
    }

    /// Re-reads the list without announcing success.
    pub async fn refresh(&mut self) -> SyncPhase {
        self.load(false).await
    }

    /// Issues a read without waiting for it.
    ///
    /// `mount`, `refresh` and the mutations issue and apply their read in
    /// one step, so they never overlap through `&mut self`. Hosts that let
    /// reads overlap go through this pair instead; a response older than the
    /// last applied one is then discarded.
    pub fn begin_read(&mut self) -> PendingRead {
        let ticket = self.list.begin_read();
        debug!(ticket = ticket.sequence(), "reading events");
        let store = Arc::clone(&self.store);
        let filter = self.filter.clone();
        PendingRead {
            ticket,
            response: Box::pin(async move { store.read(filter).await }),
        }
    }

    /// Applies a finished read, without announcing success.
    pub fn complete_read(&mut self, read: CompletedRead) -> SyncPhase {
        self.apply_read(read, false)
    }

    async fn load(&mut self, announce: bool) -> SyncPhase {
        let read = self.begin_read().finish().await;
        self.apply_read(read, announce)
    }

    fn apply_read(&mut self, read: CompletedRead, announce: bool) -> SyncPhase {
        let CompletedRead { ticket, result } = read;
        match result {
            Ok(events) => {
                let count = events.len();
                if self.list.apply(ticket, events) {
                    info!(count, "events loaded");
                    if announce {
                        self.notifier.notify(Notification::success(EVENTS_LOADED));
                    }
                } else {
                    debug!(ticket = ticket.sequence(), "discarding stale read");
                }
            }
            Err(e) => {
                if self.list.fail(ticket) {
                    error!("failed to load events: {}", e);
                    self.notifier.notify(Notification::error(EVENTS_LOAD_FAILED));
                } else {
                    debug!(ticket = ticket.sequence(), "ignoring stale read failure: {}", e);
                }
            }
        }
        self.list.phase()
    }

    /// Opens the modal in create mode for a calendar date.
    pub fn on_date_click(&mut self, date: NaiveDate) {
        self.modal = ModalState::Create {
            selected_date: date,
        };
        self.form.seed(&self.modal);
        debug!(%date, "opened create modal");
    }

    /// Opens the modal in edit mode for a listed event.
    ///
    /// Returns `false` when the event is not in the list.
    pub fn on_event_click(&mut self, id: &EventId) -> bool {
        let Some(event) = self.list.find(id).cloned() else {
            warn!(%id, "clicked event is not in the list");
            return false;
        };
        self.modal = ModalState::Edit { initial: event };
        self.form.seed(&self.modal);
        debug!(%id, "opened edit modal");
        true
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
        self.form.clear();
    }

    /// Submits the form: create in create mode, update in edit mode.
    ///
    /// A form that does not validate sends nothing and leaves the modal open.
    pub async fn submit(&mut self) -> MutationOutcome {
        let target = match &self.modal {
            ModalState::Closed => return MutationOutcome::Ignored,
            ModalState::Create { selected_date } => Target::Create(*selected_date),
            ModalState::Edit { initial } => Target::Update(initial.id.clone()),
        };

        let payload = match self.form.submit() {
            Ok(payload) => payload,
            Err(errors) => {
                warn!("form rejected: {}", errors);
                return MutationOutcome::Rejected(errors);
            }
        };

        let (operation, result) = match target {
            Target::Create(date) => (
                Operation::Create,
                self.store.create(payload.with_date(date)).await.map(drop),
            ),
            Target::Update(id) => (
                Operation::Update,
                self.store.update(id, payload).await.map(drop),
            ),
        };
        self.settle(operation, result).await
    }

    /// Deletes the event being edited. Only valid in edit mode.
    pub async fn delete(&mut self) -> MutationOutcome {
        let Some(id) = self.modal.initial().map(|event| event.id.clone()) else {
            return MutationOutcome::Ignored;
        };
        let result = self.store.delete(id).await;
        self.settle(Operation::Delete, result).await
    }

    /// Refreshes, closes the modal and reports the mutation result.
    async fn settle(&mut self, operation: Operation, result: ApiResult<()>) -> MutationOutcome {
        let outcome = match result {
            Ok(()) => {
                info!(%operation, "mutation applied");
                MutationOutcome::Applied(operation)
            }
            Err(e) => {
                error!(%operation, "mutation failed: {}", e);
                MutationOutcome::Failed(operation, e.code())
            }
        };

        self.refresh().await;
        self.close_modal();
        self.notifier
            .notify(Notification::for_outcome(operation, outcome.is_applied()));
        outcome
    }
}
