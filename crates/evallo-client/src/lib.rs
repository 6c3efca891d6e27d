//! Synchronization controller, event form, CLI host
//!
//! This crate provides the event synchronization controller and the
//! `evallo` command-line interface that hosts it.

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod list;
pub mod modal;
pub mod notify;
pub mod secret;
pub mod session;

pub use cli::Cli;
pub use controller::{CompletedRead, MutationOutcome, PendingRead, SyncController};
pub use error::{ClientError, ClientResult};
pub use form::EventForm;
pub use list::{EventList, ReadTicket, SyncPhase};
pub use modal::{ModalMode, ModalState};
pub use notify::{ConsoleNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier};
pub use session::ClientSession;
