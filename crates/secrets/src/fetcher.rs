//! Fetch one secret and project it into a [`ResultMap`]

use crate::{FetchContext, ResultMap, SecretError, SecretRequest, SecretStore, extract};

/// Fetches a single secret from a [`SecretStore`] and extracts the requested
/// fields.
///
/// Holds no cache and no mutable state, so one fetcher can serve concurrent
/// callers. Errors from the store are returned as-is; nothing is retried.
#[derive(Debug, Clone)]
pub struct SecretFetcher<S> {
    store: S,
}

impl<S: SecretStore> SecretFetcher<S> {
    /// Create a fetcher backed by `store`
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Fetch `request.identifier` and extract the fields it asks for.
    ///
    /// A blank identifier fails with [`SecretError::NotFound`] before the
    /// store is contacted.
    ///
    /// # Errors
    /// Any [`SecretError`]: store failures, payload problems, or
    /// cancellation/deadline from `ctx`.
    pub async fn fetch(
        &self,
        ctx: &FetchContext,
        request: &SecretRequest,
    ) -> Result<ResultMap, SecretError> {
        request.validate()?;
        tracing::debug!(
            secret = %request.identifier,
            provider = self.store.provider_name(),
            mode = %request.mode,
            field = ?request.field(),
            "Fetching secret"
        );

        let raw = ctx
            .run(&request.identifier, self.store.get_secret_value(request))
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    secret = %request.identifier,
                    provider = self.store.provider_name(),
                    error = %e,
                    "Secret retrieval failed"
                );
            })?;

        let values = extract(request, &raw)?;
        tracing::debug!(
            secret = %request.identifier,
            fields = values.len(),
            "Secret fetched"
        );
        Ok(values)
    }

    /// Fetch using the raw string form of a request.
    ///
    /// `mode` is validated before the store is contacted; an empty
    /// `field_name` means no field.
    ///
    /// # Errors
    /// [`SecretError::UnsupportedMode`] for an unknown mode, otherwise as
    /// [`fetch`](Self::fetch).
    pub async fn fetch_raw(
        &self,
        ctx: &FetchContext,
        identifier: &str,
        mode: &str,
        field_name: &str,
    ) -> Result<ResultMap, SecretError> {
        let request = SecretRequest::parse(identifier, mode, field_name)?;
        self.fetch(ctx, &request).await
    }
}
