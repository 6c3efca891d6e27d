//! HTTP client for the remote event API.
//!
//! Four endpoints, JSON bodies, bearer authentication:
//!
//! | Operation | Request |
//! |---|---|
//! | create | `POST /create/events` |
//! | read   | `GET /get/events` |
//! | update | `PUT /update/events/{id}` |
//! | delete | `DELETE /delete/events/{id}` |

use std::fmt;
use std::sync::Arc;

use evallo_core::{CalendarEvent, EventId, EventPayload};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::normalize::{normalize_event, normalize_events};
use crate::raw_event::RawEvent;
use crate::session::Session;
use crate::store::{BoxFuture, EventStore, Operation, ReadFilter};

/// Remote event API client.
///
/// Holds no event state. The bearer credential is fetched from the
/// [`Session`] for each request and never cached here.
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    session: Arc<dyn Session>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for the configured backend.
    pub fn new(config: ApiConfig, session: Arc<dyn Session>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ApiError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Creates an event.
    pub async fn create_event(&self, payload: &EventPayload) -> ApiResult<CalendarEvent> {
        let url = self.config.endpoint("/create/events");
        let request = self.http.post(&url).json(payload);
        let raw: RawEvent = self.execute_json(Operation::Create, request).await?;
        normalize_event(raw).map_err(|e| e.with_operation(Operation::Create))
    }

    /// Reads the full event list.
    pub async fn read_events(&self, filter: &ReadFilter) -> ApiResult<Vec<CalendarEvent>> {
        let url = self.config.endpoint("/get/events");
        let mut request = self.http.get(&url);
        if !filter.is_empty() {
            request = request.query(&filter.query_pairs());
        }
        let items: Vec<serde_json::Value> = self.execute_json(Operation::Read, request).await?;
        let total = items.len();
        let events = normalize_events(items);
        debug!(total, kept = events.len(), "read events");
        Ok(events)
    }

    /// Replaces every field of an event.
    pub async fn update_event(
        &self,
        id: &EventId,
        payload: &EventPayload,
    ) -> ApiResult<CalendarEvent> {
        let url = self.event_url("/update/events", id);
        let request = self.http.put(&url).json(payload);
        let raw: RawEvent = self.execute_json(Operation::Update, request).await?;
        normalize_event(raw).map_err(|e| e.with_operation(Operation::Update))
    }

    /// Deletes an event. Any response body is ignored.
    pub async fn delete_event(&self, id: &EventId) -> ApiResult<()> {
        let url = self.event_url("/delete/events", id);
        let request = self.http.delete(&url);
        self.execute(Operation::Delete, request).await?;
        Ok(())
    }

    fn event_url(&self, prefix: &str, id: &EventId) -> String {
        self.config.endpoint(&format!(
            "{}/{}",
            prefix,
            urlencoding::encode(id.as_str())
        ))
    }

    /// Resolves the bearer credential for one request.
    fn bearer(&self, operation: Operation) -> ApiResult<String> {
        self.session
            .credential()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                ApiError::auth("no credential available, log in first").with_operation(operation)
            })
    }

    /// Sends a request and maps transport failures and error statuses.
    async fn execute(&self, operation: Operation, request: RequestBuilder) -> ApiResult<Response> {
        let token = self.bearer(operation)?;
        let request = request.bearer_auth(token);

        trace!(%operation, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e).with_operation(operation))?;

        let status = response.status();
        debug!(%operation, %status, "received response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body).with_operation(operation));
        }
        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.execute(operation, request).await?;
        let body = response.text().await.map_err(|e| {
            ApiError::network(format!("failed to read response: {}", e))
                .with_operation(operation)
                .with_source(e)
        })?;
        serde_json::from_str(&body).map_err(|e| {
            ApiError::invalid_response(format!("failed to parse response: {}", e))
                .with_operation(operation)
                .with_source(e)
        })
    }
}

impl EventStore for ApiClient {
    fn create(&self, payload: EventPayload) -> BoxFuture<'_, ApiResult<CalendarEvent>> {
        Box::pin(async move { self.create_event(&payload).await })
    }

    fn read(&self, filter: ReadFilter) -> BoxFuture<'_, ApiResult<Vec<CalendarEvent>>> {
        Box::pin(async move { self.read_events(&filter).await })
    }

    fn update(
        &self,
        id: EventId,
        payload: EventPayload,
    ) -> BoxFuture<'_, ApiResult<CalendarEvent>> {
        Box::pin(async move { self.update_event(&id, &payload).await })
    }

    fn delete(&self, id: EventId) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move { self.delete_event(&id).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorCode;
    use crate::session::MemorySession;

    fn client(session: MemorySession) -> ApiClient {
        ApiClient::new(ApiConfig::new("http://127.0.0.1:9/api/"), Arc::new(session)).unwrap()
    }

    #[test]
    fn event_urls_are_percent_encoded() {
        let client = client(MemorySession::new());
        assert_eq!(
            client.event_url("/update/events", &EventId::from("a b/c")),
            "http://127.0.0.1:9/api/update/events/a%20b%2Fc"
        );
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let client = client(MemorySession::with_token("  "));
        let err = client.bearer(Operation::Read).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::AuthError);
        assert_eq!(err.operation(), Some(Operation::Read));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_sending() {
        let client = client(MemorySession::new());
        let err = client.read_events(&ReadFilter::new()).await.unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::AuthError);
        assert!(err.status().is_none());
    }
}
