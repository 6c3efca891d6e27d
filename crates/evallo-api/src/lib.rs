//! Event store abstraction and the remote API client.
//!
//! - [`EventStore`] - the four operations every event backend implements
//! - [`ApiClient`] - HTTP implementation against the remote event API
//! - [`MemoryStore`] - in-memory implementation with call recording
//! - [`Session`] / [`CredentialStore`] - per-request credentials and token persistence
//! - [`normalize_event`] - ingestion of raw records into [`evallo_core::CalendarEvent`]
//! - [`ApiError`] - error taxonomy for store operations
//!
//! ```text
//!  RawEvent (id | _id) ──normalize──▶ CalendarEvent
//!         ▲                                 │
//!         │ JSON                            ▼
//!  ┌─────────────┐    EventStore    ┌──────────────────┐
//!  │  ApiClient  │◀────────────────│  controller      │
//!  └─────────────┘                  └──────────────────┘
//!         │ bearer token per request
//!         ▼
//!     Session (TokenStore, MemorySession)
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod normalize;
pub mod raw_event;
pub mod session;
pub mod store;

pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use memory::{MemoryStore, StoreCall};
pub use normalize::{normalize_event, normalize_events, normalize_value};
pub use raw_event::RawEvent;
pub use session::{CredentialStore, MemorySession, Session, StoredToken, TokenStore};
pub use store::{BoxFuture, EventStore, Operation, ReadFilter};
