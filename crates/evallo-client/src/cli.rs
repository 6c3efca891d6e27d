//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use evallo_core::Field;
use url::Url;

/// evallo - manage your calendar events from the terminal
#[derive(Debug, Parser)]
#[command(name = "evallo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "EVALLO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Page URL to bootstrap the login token from (`...?token=T`)
    #[arg(long, global = true)]
    pub url: Option<Url>,

    /// Base URL of the event API
    #[arg(long, global = true, env = "EVALLO_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List events
    List {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Create an event on a calendar day
    Create {
        /// Day clicked on the calendar (YYYY-MM-DD)
        #[arg(long)]
        on: NaiveDate,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Edit an event, changing only the given fields
    Edit {
        /// Event identifier
        id: String,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Delete an event
    Delete {
        /// Event identifier
        id: String,
    },

    /// Authentication commands
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Form fields, as typed into the event modal.
#[derive(Debug, Clone, Default, Args)]
pub struct EventFields {
    /// Event title
    #[arg(long)]
    pub title: Option<String>,

    /// Event description
    #[arg(long)]
    pub description: Option<String>,

    /// Comma-separated participant emails
    #[arg(long)]
    pub participants: Option<String>,

    /// Date field (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Start time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,

    /// Duration in hours
    #[arg(long)]
    pub duration: Option<String>,

    /// Session notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl EventFields {
    /// Returns the fields that were given on the command line.
    pub fn values(&self) -> Vec<(Field, &str)> {
        [
            (Field::Title, &self.title),
            (Field::Description, &self.description),
            (Field::Participants, &self.participants),
            (Field::Date, &self.date),
            (Field::Time, &self.time),
            (Field::Duration, &self.duration),
            (Field::SessionNotes, &self.notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Authentication actions.
#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Open the login page in a browser
    Login,

    /// Store the token carried by a post-login page URL
    Bootstrap {
        /// URL the login flow redirected to
        page_url: Url,
    },

    /// Forget the stored token
    Logout,

    /// Show whether a token is stored
    Status,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
