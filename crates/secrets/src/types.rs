//! Secret value types
//!
//! - [`SecureSecret`]: raw store payload, wrapped in `secrecy::SecretString`
//! - [`ResultMap`]: the flat field → value map handed back to callers

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

/// Field name → string value produced by a fetch.
///
/// Holds at most one entry for plaintext and targeted JSON requests.
pub type ResultMap = HashMap<String, String>;

/// A raw secret payload with automatic memory zeroing on drop.
///
/// `Debug` and `Display` print `[REDACTED]`; reading the value requires an
/// explicit [`expose`](Self::expose) call.
#[derive(Clone)]
pub struct SecureSecret {
    inner: SecretString,
}

impl SecureSecret {
    /// Create a new secure secret from a string.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self {
            inner: SecretString::from(value),
        }
    }

    /// A secret with no payload, as returned for binary-only secrets.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Expose the secret value for use.
    ///
    /// The exposed value must not be logged.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Get the length of the secret value without exposing it.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Check if the secret value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl From<String> for SecureSecret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureSecret {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::fmt::Display for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
