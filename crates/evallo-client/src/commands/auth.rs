//! Authentication commands.

use evallo_api::TokenStore;
use tracing::{info, warn};
use url::Url;

use crate::bootstrap::{Bootstrap, bootstrap as bootstrap_url};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

fn token_store(config: &ClientConfig) -> ClientResult<TokenStore> {
    Ok(TokenStore::open(config.token_path())?)
}

/// Opens the backend login page in the default browser.
///
/// The login flow ends on the calendar page with `?token=T`; pass that URL
/// to `evallo auth bootstrap` (or `--url`) to store the token.
pub fn login(config: &ClientConfig, api_url: Option<&str>) -> ClientResult<()> {
    let login_url = config.to_api_config(api_url).login_url();

    println!("Opening the login page in your browser...");
    println!("If the browser doesn't open, visit:");
    println!("  {}", login_url);
    println!();
    println!("When you land back on the calendar, run:");
    println!("  evallo auth bootstrap '<calendar URL>'");

    if let Err(e) = open::that(&login_url) {
        warn!("could not open browser: {}", e);
    }
    Ok(())
}

/// Stores the token carried by a post-login URL.
pub fn bootstrap(config: &ClientConfig, mut url: Url) -> ClientResult<()> {
    let store = token_store(config)?;
    match bootstrap_url(&mut url, &store)? {
        Bootstrap::Stored => {
            info!("token stored at {}", store.path().display());
            println!("Token stored.");
            println!("Cleaned URL: {}", url);
            Ok(())
        }
        Bootstrap::NoToken => Err(ClientError::Config(format!(
            "no `token` parameter in {}",
            url
        ))),
    }
}

/// Removes the stored token.
pub fn logout(config: &ClientConfig) -> ClientResult<()> {
    let store = token_store(config)?;
    store.clear()?;
    println!("Logged out.");
    Ok(())
}

/// Reports whether a token is stored.
pub fn status(config: &ClientConfig) -> ClientResult<()> {
    let store = token_store(config)?;
    match store.get() {
        Some(token) => println!(
            "Logged in (token stored {} at {})",
            token.stored_at.format("%Y-%m-%d %H:%M UTC"),
            store.path().display()
        ),
        None if config.auth.token.is_some() => {
            println!("Using the token from config.toml [auth] section.")
        }
        None => println!("Not logged in. Run: evallo auth login"),
    }
    Ok(())
}
