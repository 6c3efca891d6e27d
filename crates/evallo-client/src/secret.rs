//! Secret references in `config.toml`.
//!
//! A value can point at a secret stored outside the file:
//!
//! - `pass::path/in/store` runs `pass show path/in/store` and keeps the first line
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - anything else is used as-is

use crate::error::{ClientError, ClientResult};

/// A parsed secret reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretRef<'a> {
    Pass(&'a str),
    Env(&'a str),
    Plain(&'a str),
}

impl<'a> SecretRef<'a> {
    pub fn parse(value: &'a str) -> Self {
        if let Some(path) = value.strip_prefix("pass::") {
            Self::Pass(path)
        } else if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else {
            Self::Plain(value)
        }
    }

    /// Fetches the secret value.
    pub fn resolve(&self) -> ClientResult<String> {
        match self {
            Self::Pass(path) => resolve_pass(path),
            Self::Env(var) => std::env::var(var).map_err(|_| {
                ClientError::Config(format!("environment variable `{}` is not set", var))
            }),
            Self::Plain(value) => Ok(value.to_string()),
        }
    }
}

/// Resolves a value that may be a secret reference.
pub fn resolve(value: &str) -> ClientResult<String> {
    SecretRef::parse(value).resolve()
}

fn resolve_pass(path: &str) -> ClientResult<String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| ClientError::Config(format!("failed to run `pass show {}`: {}", path, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClientError::Config(format!(
            "`pass show {}` failed ({}): {}",
            path,
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| ClientError::Config(format!("`pass show {}` produced no output", path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixes() {
        assert_eq!(SecretRef::parse("pass::evallo/token"), SecretRef::Pass("evallo/token"));
        assert_eq!(SecretRef::parse("env::EVALLO_TOKEN"), SecretRef::Env("EVALLO_TOKEN"));
        assert_eq!(SecretRef::parse("abc"), SecretRef::Plain("abc"));
    }

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(resolve("tok-123").unwrap(), "tok-123");
        assert_eq!(resolve("").unwrap(), "");
    }

    #[test]
    fn env_reference_resolves() {
        unsafe {
            std::env::set_var("_EVALLO_SECRET_TEST", "from-env");
        }
        assert_eq!(resolve("env::_EVALLO_SECRET_TEST").unwrap(), "from-env");
        unsafe {
            std::env::remove_var("_EVALLO_SECRET_TEST");
        }
    }

    #[test]
    fn missing_env_var_errors() {
        let err = resolve("env::_EVALLO_SECRET_MISSING_4711").unwrap_err();
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn failing_pass_lookup_errors() {
        assert!(resolve("pass::evallo/entry/that/does/not/exist/4711").is_err());
    }
}
