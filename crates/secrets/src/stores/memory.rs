//! In-memory secret store

use crate::{SecretError, SecretRequest, SecretStore, SecureSecret};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone)]
enum Entry {
    Value(SecureSecret),
    Failure(String),
}

/// Serves secrets from an in-process map.
///
/// Unknown identifiers produce [`SecretError::NotFound`]. Failures registered
/// with [`with_failure`](Self::with_failure) produce [`SecretError::Retrieval`].
/// Version selectors on the request are ignored.
#[derive(Default)]
pub struct MemorySecretStore {
    entries: HashMap<String, Entry>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl MemorySecretStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret with a string payload
    #[must_use]
    pub fn with_secret(mut self, identifier: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(
            identifier.into(),
            Entry::Value(SecureSecret::new(value.into())),
        );
        self
    }

    /// Add a secret that exists but has no string payload
    #[must_use]
    pub fn with_binary_secret(mut self, identifier: impl Into<String>) -> Self {
        self.entries
            .insert(identifier.into(), Entry::Value(SecureSecret::empty()));
        self
    }

    /// Make lookups of `identifier` fail as a transport error would
    #[must_use]
    pub fn with_failure(mut self, identifier: impl Into<String>, message: impl Into<String>) -> Self {
        self.entries
            .insert(identifier.into(), Entry::Failure(message.into()));
        self
    }

    /// Delay every lookup by `latency`
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of lookups served so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for MemorySecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySecretStore")
            .field("secrets", &self.entries.keys().collect::<Vec<_>>())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn get_secret_value(&self, request: &SecretRequest) -> Result<SecureSecret, SecretError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.entries.get(&request.identifier) {
            Some(Entry::Value(secret)) => Ok(secret.clone()),
            Some(Entry::Failure(message)) => Err(SecretError::Retrieval {
                identifier: request.identifier.clone(),
                message: message.clone(),
                source: None,
            }),
            None => Err(SecretError::NotFound {
                identifier: request.identifier.clone(),
                source: None,
            }),
        }
    }
}
