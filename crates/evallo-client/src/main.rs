//! evallo CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use evallo_core::{TracingConfig, TracingOutputFormat, init_tracing};

use evallo_client::cli::{AuthAction, Cli, Command, ConfigAction};
use evallo_client::commands::{self, events::Context};
use evallo_client::config::ClientConfig;
use evallo_client::error::ClientResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if cli.log_json {
        tracing_config = tracing_config.with_format(TracingOutputFormat::Json);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    let api_url = cli.api_url.as_deref();
    let ctx = Context {
        config: &config,
        api_url,
        page_url: cli.url.clone(),
    };

    match cli.command {
        Command::List { from, to, json } => commands::events::list(ctx, from, to, json).await,
        Command::Create { on, fields } => commands::events::create(ctx, on, fields).await,
        Command::Edit { id, fields } => commands::events::edit(ctx, id, fields).await,
        Command::Delete { id } => commands::events::delete(ctx, id).await,
        Command::Auth { action } => match action {
            AuthAction::Login => commands::auth::login(&config, api_url),
            AuthAction::Bootstrap { page_url } => commands::auth::bootstrap(&config, page_url),
            AuthAction::Logout => commands::auth::logout(&config),
            AuthAction::Status => commands::auth::status(&config),
        },
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config),
        },
    }
}
