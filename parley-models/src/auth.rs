//! API key handling for hosted providers.
//!
//! Keys are read from the environment and wrapped in [`ApiKey`] so they never
//! show up in `Debug` output or logs.
//!
//! # Example
//!
//! ```ignore
//! use parley_models::auth::ApiKey;
//!
//! // Checks GEMINI_API_KEY, then GOOGLE_API_KEY
//! let key = ApiKey::from_env("gemini")?;
//! ```

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Result};

/// A secure API key that prevents accidental logging.
///
/// The key is wrapped in `SecretString` which:
/// - Implements `Debug` as `"[REDACTED]"`
/// - Zeroizes memory on drop
/// - Requires explicit `.expose_secret()` to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Look up the key for `provider` in its environment variables.
    ///
    /// Variables are checked in order; empty values are skipped.
    pub fn from_env(provider: &str) -> Result<Self> {
        for var in env_vars_for_provider(provider) {
            if let Ok(value) = env::var(var)
                && !value.trim().is_empty()
            {
                debug!(provider, var, "Using API key from environment");
                return Ok(Self::new(value));
            }
        }
        Err(Error::CredentialsNotFound(provider.to_string()))
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Environment variable names for each provider, in lookup order.
const ENV_VARS: &[(&str, &[&str])] = &[("gemini", &["GEMINI_API_KEY", "GOOGLE_API_KEY"])];

/// Get the environment variable names for a provider.
pub fn env_vars_for_provider(provider: &str) -> &'static [&'static str] {
    ENV_VARS
        .iter()
        .find(|(p, _)| *p == provider)
        .map(|(_, vars)| *vars)
        .unwrap_or(&[])
}
