//! Secret retrieval for smfetch
//!
//! Fetches one named secret from a secret store and projects it into a flat
//! string map, either as a whole value (plaintext mode) or as fields of a
//! JSON object (JSON mode).
//!
//! # Example
//!
//! ```ignore
//! use smfetch_secrets::{FetchContext, MemorySecretStore, SecretFetcher, SecretRequest};
//!
//! let store = MemorySecretStore::new().with_secret("db", r#"{"user":"app","port":5432}"#);
//! let fetcher = SecretFetcher::new(store);
//!
//! let ctx = FetchContext::with_timeout(std::time::Duration::from_secs(5));
//! let request = SecretRequest::parse("db", "json", "user")?;
//! let values = fetcher.fetch(&ctx, &request).await?;
//! assert_eq!(values["user"], "app");
//! ```
//!
//! Cloud providers live in separate crates:
//! - smfetch-aws: `AwsSecretStore`, `retrieve_secret`

mod context;
mod extract;
mod fetcher;
mod mode;
mod request;
pub mod stores;
mod types;

pub use context::FetchContext;
pub use extract::extract;
pub use fetcher::SecretFetcher;
pub use mode::SecretMode;
pub use request::SecretRequest;
pub use stores::MemorySecretStore;
pub use types::{ResultMap, SecureSecret};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Boxed error cause carried by wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for secret retrieval
#[derive(Debug, Error)]
pub enum SecretError {
    /// Ambient credentials or configuration could not be resolved
    #[error("Failed to load secret store configuration: {message}")]
    ConfigLoad {
        /// What went wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxError>,
    },

    /// The identifier does not resolve to an existing secret
    #[error("Secret '{identifier}' not found")]
    NotFound {
        /// Secret name or ARN
        identifier: String,
        /// Error reported by the store
        #[source]
        source: Option<BoxError>,
    },

    /// Any other store failure (network, auth, throttling)
    #[error("Failed to retrieve secret '{identifier}': {message}")]
    Retrieval {
        /// Secret name or ARN
        identifier: String,
        /// Error message from the store
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxError>,
    },

    /// The fetched value is empty or has no string payload
    #[error("Secret '{identifier}' is empty or has no string value")]
    EmptySecret {
        /// Secret name or ARN
        identifier: String,
    },

    /// JSON mode, but the payload is not a JSON object
    #[error("Secret '{identifier}' is not a valid JSON object: {source}")]
    Parse {
        /// Secret name or ARN
        identifier: String,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// The requested field is absent from the JSON object
    #[error("Field '{field}' not found in JSON secret '{identifier}'")]
    FieldNotFound {
        /// Secret name or ARN
        identifier: String,
        /// Requested field
        field: String,
    },

    /// The requested field exists but is not a string
    #[error("Field '{field}' in JSON secret '{identifier}' is {found}, expected a string")]
    TypeMismatch {
        /// Secret name or ARN
        identifier: String,
        /// Requested field
        field: String,
        /// JSON type actually found (e.g. "a number")
        found: &'static str,
    },

    /// Mode is neither plaintext nor json
    #[error("Unsupported secret mode '{mode}' (use \"plaintext\" or \"json\")")]
    UnsupportedMode {
        /// The mode that was requested
        mode: String,
    },

    /// The caller cancelled the operation
    #[error("Retrieval of secret '{identifier}' was cancelled")]
    Cancelled {
        /// Secret name or ARN
        identifier: String,
    },

    /// The caller's deadline passed before the operation completed
    #[error("Retrieval of secret '{identifier}' exceeded its deadline ({elapsed:?})")]
    DeadlineExceeded {
        /// Secret name or ARN
        identifier: String,
        /// Time spent before giving up
        elapsed: Duration,
    },
}

/// Discriminant of [`SecretError`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretErrorKind {
    /// See [`SecretError::ConfigLoad`]
    ConfigLoad,
    /// See [`SecretError::NotFound`]
    NotFound,
    /// See [`SecretError::Retrieval`]
    Retrieval,
    /// See [`SecretError::EmptySecret`]
    EmptySecret,
    /// See [`SecretError::Parse`]
    Parse,
    /// See [`SecretError::FieldNotFound`]
    FieldNotFound,
    /// See [`SecretError::TypeMismatch`]
    TypeMismatch,
    /// See [`SecretError::UnsupportedMode`]
    UnsupportedMode,
    /// See [`SecretError::Cancelled`]
    Cancelled,
    /// See [`SecretError::DeadlineExceeded`]
    DeadlineExceeded,
}

impl SecretError {
    /// Get the failure class of this error
    #[must_use]
    pub const fn kind(&self) -> SecretErrorKind {
        match self {
            Self::ConfigLoad { .. } => SecretErrorKind::ConfigLoad,
            Self::NotFound { .. } => SecretErrorKind::NotFound,
            Self::Retrieval { .. } => SecretErrorKind::Retrieval,
            Self::EmptySecret { .. } => SecretErrorKind::EmptySecret,
            Self::Parse { .. } => SecretErrorKind::Parse,
            Self::FieldNotFound { .. } => SecretErrorKind::FieldNotFound,
            Self::TypeMismatch { .. } => SecretErrorKind::TypeMismatch,
            Self::UnsupportedMode { .. } => SecretErrorKind::UnsupportedMode,
            Self::Cancelled { .. } => SecretErrorKind::Cancelled,
            Self::DeadlineExceeded { .. } => SecretErrorKind::DeadlineExceeded,
        }
    }

    /// Build a [`SecretError::ConfigLoad`] without an underlying cause
    #[must_use]
    pub fn config_load(message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`SecretError::Retrieval`] wrapping `cause`
    #[must_use]
    pub fn retrieval<E>(identifier: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Retrieval {
            identifier: identifier.into(),
            message: cause.to_string(),
            source: Some(Box::new(cause)),
        }
    }

    /// Whether the store reported that the secret does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A remote store that can return the raw value of one secret.
///
/// Implementors map "secret does not exist" to [`SecretError::NotFound`] and
/// every other failure to [`SecretError::Retrieval`]. A secret without a
/// string payload is returned as an empty [`SecureSecret`].
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the raw value for `request.identifier`.
    async fn get_secret_value(&self, request: &SecretRequest) -> Result<SecureSecret, SecretError>;

    /// Get the provider name for this store.
    ///
    /// Examples: `"memory"`, `"aws"`
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<S: SecretStore + ?Sized> SecretStore for std::sync::Arc<S> {
    async fn get_secret_value(&self, request: &SecretRequest) -> Result<SecureSecret, SecretError> {
        (**self).get_secret_value(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
