//! The CLI's credential source.

use std::sync::Arc;

use evallo_api::{ApiResult, CredentialStore, Session, TokenStore};

/// Session backed by the token file, with an optional configured token.
///
/// The token file wins so a fresh login takes effect immediately. The
/// configured token (from `[auth] token`) is used when no login happened.
#[derive(Debug)]
pub struct ClientSession {
    tokens: Arc<TokenStore>,
    configured: Option<String>,
}

impl ClientSession {
    pub fn new(tokens: Arc<TokenStore>, configured: Option<String>) -> Self {
        Self {
            tokens,
            configured: configured.filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }
}

impl Session for ClientSession {
    fn credential(&self) -> Option<String> {
        self.tokens
            .stored_credential()
            .or_else(|| self.configured.clone())
    }
}

impl CredentialStore for ClientSession {
    fn store_credential(&self, token: &str) -> ApiResult<()> {
        self.tokens.store_credential(token)
    }

    fn stored_credential(&self) -> Option<String> {
        self.tokens.stored_credential()
    }
}
