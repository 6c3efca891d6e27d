//! Event commands.
//!
//! Each command plays one page interaction against a freshly mounted
//! controller: mount, then a date click or event click, then submit or
//! delete.

use std::sync::Arc;

use chrono::NaiveDate;
use evallo_api::{ApiClient, EventStore, ReadFilter, TokenStore};
use evallo_core::{CalendarEvent, EventId, Field};
use tracing::debug;
use url::Url;

use crate::cli::EventFields;
use crate::config::ClientConfig;
use crate::controller::{MutationOutcome, SyncController};
use crate::error::{ClientError, ClientResult};
use crate::list::SyncPhase;
use crate::notify::ConsoleNotifier;
use crate::session::ClientSession;

/// Connection settings shared by the event commands.
pub struct Context<'a> {
    pub config: &'a ClientConfig,
    pub api_url: Option<&'a str>,
    pub page_url: Option<Url>,
}

impl Context<'_> {
    /// Builds a controller talking to the configured backend.
    fn controller(&self, filter: ReadFilter) -> ClientResult<SyncController> {
        let tokens = Arc::new(TokenStore::open(self.config.token_path())?);
        let session = Arc::new(ClientSession::new(tokens, self.config.resolve_token()?));
        let client = ApiClient::new(self.config.to_api_config(self.api_url), session.clone())?;
        let store: Arc<dyn EventStore> = Arc::new(client);
        Ok(SyncController::new(store, Arc::new(ConsoleNotifier), session).with_filter(filter))
    }

    /// Mounts a controller, failing when the list could not be loaded.
    async fn mount(&mut self, filter: ReadFilter) -> ClientResult<SyncController> {
        let mut controller = self.controller(filter)?;
        let phase = controller.mount(self.page_url.as_mut()).await;
        if let Some(url) = &self.page_url {
            debug!("page URL after bootstrap: {}", url);
        }
        match phase {
            SyncPhase::Error => Err(ClientError::Api("failed to load events".to_string())),
            _ => Ok(controller),
        }
    }
}

/// Renders one event as a single line.
pub fn format_event(event: &CalendarEvent) -> String {
    let mut line = format!(
        "{} {} {:>5}h  {}",
        event.date,
        event.time.format("%H:%M"),
        event.duration,
        event.title
    );
    let participants: Vec<&str> = event
        .participants
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    if !participants.is_empty() {
        line.push_str(&format!(" ({})", participants.join(", ")));
    }
    line.push_str(&format!("  [{}]", event.id));
    line
}

/// Prints the list of events.
pub async fn list(
    mut ctx: Context<'_>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> ClientResult<()> {
    let mut filter = ReadFilter::new();
    if let Some(from) = from {
        filter = filter.with_from(from);
    }
    if let Some(to) = to {
        filter = filter.with_to(to);
    }

    let controller = ctx.mount(filter).await?;
    let events = controller.events();

    if json {
        let out = serde_json::to_string_pretty(events)
            .map_err(|e| ClientError::Action(format!("failed to serialize events: {}", e)))?;
        println!("{}", out);
    } else if events.is_empty() {
        println!("No events");
    } else {
        for event in events {
            println!("{}", format_event(event));
        }
    }
    Ok(())
}

fn fill(controller: &mut SyncController, fields: &EventFields) {
    let form = controller.form_mut();
    for (field, value) in fields.values() {
        form.set(field, value);
    }
}

fn finish(outcome: MutationOutcome) -> ClientResult<()> {
    match outcome {
        MutationOutcome::Applied(_) => Ok(()),
        MutationOutcome::Failed(operation, code) => Err(ClientError::Api(format!(
            "{} failed: {}",
            operation,
            code.as_str()
        ))),
        MutationOutcome::Rejected(errors) => Err(ClientError::Invalid(errors)),
        MutationOutcome::Ignored => Err(ClientError::Action("nothing to submit".to_string())),
    }
}

/// Creates an event on the clicked day.
///
/// The date field defaults to the clicked day; the created event always
/// lands on that day.
pub async fn create(mut ctx: Context<'_>, on: NaiveDate, fields: EventFields) -> ClientResult<()> {
    let mut controller = ctx.mount(ReadFilter::new()).await?;
    controller.on_date_click(on);
    controller.form_mut().set(Field::Date, on.to_string());
    fill(&mut controller, &fields);
    finish(controller.submit().await)
}

/// Edits an event, keeping every field that was not given.
pub async fn edit(mut ctx: Context<'_>, id: String, fields: EventFields) -> ClientResult<()> {
    let mut controller = ctx.mount(ReadFilter::new()).await?;
    if !controller.on_event_click(&EventId::from(id.as_str())) {
        return Err(ClientError::UnknownEvent(id));
    }
    fill(&mut controller, &fields);
    finish(controller.submit().await)
}

/// Deletes an event.
pub async fn delete(mut ctx: Context<'_>, id: String) -> ClientResult<()> {
    let mut controller = ctx.mount(ReadFilter::new()).await?;
    if !controller.on_event_click(&EventId::from(id.as_str())) {
        return Err(ClientError::UnknownEvent(id));
    }
    finish(controller.delete().await)
}
