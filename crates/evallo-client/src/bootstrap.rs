//! Login token bootstrap from the page URL.
//!
//! After login the OAuth provider sends the user back to the calendar page
//! with `?token=T`. The token is persisted and removed from the URL so it
//! does not linger in history or get re-applied.

use evallo_api::{ApiResult, CredentialStore};
use tracing::{debug, info};
use url::Url;

/// Query parameter carrying the login token.
pub const TOKEN_PARAM: &str = "token";

/// What a bootstrap pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// No usable token in the URL. Nothing was changed.
    NoToken,
    /// A token was persisted and stripped from the URL.
    Stored,
}

/// Returns the first non-empty `token` query parameter.
pub fn extract_token(url: &Url) -> Option<String> {
    url.query_pairs()
        .filter(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .find(|value| !value.trim().is_empty())
}

/// Removes every `token` parameter, keeping the others in order.
pub fn strip_token(url: &mut Url) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TOKEN_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}

/// Persists the URL token, if any, and strips it from the URL.
///
/// Running it again on the stripped URL is a no-op.
pub fn bootstrap(url: &mut Url, store: &dyn CredentialStore) -> ApiResult<Bootstrap> {
    let Some(token) = extract_token(url) else {
        debug!("no login token in page URL");
        return Ok(Bootstrap::NoToken);
    };

    store.store_credential(&token)?;
    strip_token(url);
    info!("stored login token from page URL");
    Ok(Bootstrap::Stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evallo_api::MemorySession;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn extracts_first_non_empty_token() {
        assert_eq!(
            extract_token(&url("http://app/calendar?token=abc")).as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_token(&url("http://app/calendar?token=&token=xyz")).as_deref(),
            Some("xyz")
        );
        assert_eq!(extract_token(&url("http://app/calendar?token=")), None);
        assert_eq!(extract_token(&url("http://app/calendar")), None);
    }

    #[test]
    fn strip_keeps_other_params() {
        let mut u = url("http://app/calendar?view=month&token=abc&day=3");
        strip_token(&mut u);
        assert_eq!(u.as_str(), "http://app/calendar?view=month&day=3");

        let mut u = url("http://app/calendar?token=abc");
        strip_token(&mut u);
        assert_eq!(u.as_str(), "http://app/calendar");
    }

    #[test]
    fn bootstrap_stores_and_strips() {
        let session = MemorySession::new();
        let mut u = url("http://app/calendar?token=abc");

        assert_eq!(bootstrap(&mut u, &session).unwrap(), Bootstrap::Stored);
        assert_eq!(session.stored_credential().as_deref(), Some("abc"));
        assert_eq!(u.query(), None);

        assert_eq!(bootstrap(&mut u, &session).unwrap(), Bootstrap::NoToken);
        assert_eq!(session.stored_credential().as_deref(), Some("abc"));
    }

    #[test]
    fn empty_token_changes_nothing() {
        let session = MemorySession::with_token("old");
        let mut u = url("http://app/calendar?token=");

        assert_eq!(bootstrap(&mut u, &session).unwrap(), Bootstrap::NoToken);
        assert_eq!(session.stored_credential().as_deref(), Some("old"));
        assert_eq!(u.as_str(), "http://app/calendar?token=");
    }
}
