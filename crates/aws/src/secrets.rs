//! AWS Secrets Manager secret store

use crate::config::{AwsStoreConfig, load_sdk_config, secrets_client};
use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use aws_sdk_secretsmanager::operation::get_secret_value::builders::GetSecretValueFluentBuilder;
use smfetch_secrets::{
    FetchContext, ResultMap, SecretError, SecretFetcher, SecretRequest, SecretStore, SecureSecret,
};

/// Reads secrets with `GetSecretValue`.
///
/// The request identifier may be a secret name or a full ARN. Version
/// selectors on the request are forwarded as-is.
#[derive(Debug, Clone)]
pub struct AwsSecretStore {
    client: Client,
}

impl AwsSecretStore {
    /// Wrap an existing Secrets Manager client
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Resolve ambient configuration and build a store from it.
    ///
    /// # Errors
    /// Returns [`SecretError::ConfigLoad`] if region or credentials cannot be
    /// resolved.
    pub async fn from_env(config: &AwsStoreConfig) -> Result<Self, SecretError> {
        let sdk_config = load_sdk_config(config).await?;
        Ok(Self::new(secrets_client(&sdk_config, config)))
    }

    fn get_secret_value_call(&self, request: &SecretRequest) -> GetSecretValueFluentBuilder {
        let mut call = self
            .client
            .get_secret_value()
            .secret_id(&request.identifier);

        if let Some(version_id) = &request.version_id {
            call = call.version_id(version_id);
        }

        if let Some(version_stage) = &request.version_stage {
            call = call.version_stage(version_stage);
        }

        call
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    fn provider_name(&self) -> &'static str {
        "aws"
    }

    async fn get_secret_value(&self, request: &SecretRequest) -> Result<SecureSecret, SecretError> {
        let response = self
            .get_secret_value_call(request)
            .send()
            .await
            .map_err(|e| map_get_secret_error(&request.identifier, e))?;

        // Binary-only secrets have no string payload
        Ok(response
            .secret_string()
            .map_or_else(SecureSecret::empty, SecureSecret::from))
    }
}

/// Split SDK failures into "does not exist" and everything else.
fn map_get_secret_error(identifier: &str, err: SdkError<GetSecretValueError>) -> SecretError {
    let not_found = err
        .as_service_error()
        .is_some_and(GetSecretValueError::is_resource_not_found_exception);

    if not_found {
        return SecretError::NotFound {
            identifier: identifier.to_string(),
            source: Some(Box::new(err)),
        };
    }

    SecretError::Retrieval {
        identifier: identifier.to_string(),
        message: format!("AWS Secrets Manager error: {}", DisplayErrorContext(&err)),
        source: Some(Box::new(err)),
    }
}

/// Fetch one secret from AWS Secrets Manager and extract the requested fields.
///
/// `mode` must be `"plaintext"` or `"json"` and is checked before any network
/// activity. An empty `field_name` returns every string field in JSON mode,
/// and keys the value under `""` in plaintext mode.
///
/// Each call resolves configuration and credentials afresh; nothing is
/// cached between calls. Both the configuration step and the API call are
/// bounded by `ctx`.
///
/// # Errors
/// Any [`SecretError`]; branch on [`SecretError::kind`] to tell a missing
/// secret apart from other failures.
pub async fn retrieve_secret(
    ctx: &FetchContext,
    identifier: &str,
    mode: &str,
    field_name: &str,
) -> Result<ResultMap, SecretError> {
    let request = SecretRequest::parse(identifier, mode, field_name)?;
    retrieve_secret_with(ctx, &request, &AwsStoreConfig::from_env()).await
}

/// [`retrieve_secret`] with an explicit request and configuration overrides.
///
/// # Errors
/// Any [`SecretError`].
pub async fn retrieve_secret_with(
    ctx: &FetchContext,
    request: &SecretRequest,
    config: &AwsStoreConfig,
) -> Result<ResultMap, SecretError> {
    request.validate()?;
    let store = ctx
        .run(&request.identifier, AwsSecretStore::from_env(config))
        .await?;
    SecretFetcher::new(store).fetch(ctx, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_secretsmanager::types::error::{InternalServiceError, ResourceNotFoundException};
    use aws_smithy_runtime_api::http::{Response, StatusCode};
    use aws_smithy_types::body::SdkBody;
    use smfetch_secrets::{SecretErrorKind, SecretMode};
    use std::error::Error as _;

    fn service_error(err: GetSecretValueError, status: u16) -> SdkError<GetSecretValueError> {
        let raw = Response::new(StatusCode::try_from(status).unwrap(), SdkBody::empty());
        SdkError::service_error(err, raw)
    }

    fn offline_store() -> AwsSecretStore {
        let conf = aws_sdk_secretsmanager::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "static"))
            .build();
        AwsSecretStore::new(Client::from_conf(conf))
    }

    #[test]
    fn test_version_selectors_are_forwarded() {
        let store = offline_store();
        let request = SecretRequest::new("prod/db", SecretMode::Json)
            .with_version_id("EXAMPLE1-90ab-cdef-fedc-ba987SECRET1")
            .with_version_stage("AWSPREVIOUS");

        let call = store.get_secret_value_call(&request);
        let input = call.as_input();
        assert_eq!(input.get_secret_id().as_deref(), Some("prod/db"));
        assert_eq!(
            input.get_version_id().as_deref(),
            Some("EXAMPLE1-90ab-cdef-fedc-ba987SECRET1")
        );
        assert_eq!(input.get_version_stage().as_deref(), Some("AWSPREVIOUS"));
    }

    #[test]
    fn test_version_selectors_omitted_by_default() {
        let store = offline_store();
        let request = SecretRequest::new("prod/db", SecretMode::Plaintext);

        let call = store.get_secret_value_call(&request);
        let input = call.as_input();
        assert_eq!(input.get_secret_id().as_deref(), Some("prod/db"));
        assert!(input.get_version_id().is_none());
        assert!(input.get_version_stage().is_none());
    }

    #[test]
    fn test_resource_not_found_maps_to_not_found() {
        let err = service_error(
            GetSecretValueError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Secrets Manager can't find the specified secret.")
                    .build(),
            ),
            400,
        );

        let mapped = map_get_secret_error("prod/missing", err);
        assert_eq!(mapped.kind(), SecretErrorKind::NotFound);
        assert!(mapped.to_string().contains("prod/missing"));
        assert!(mapped.source().is_some());
    }

    #[test]
    fn test_other_service_error_maps_to_retrieval() {
        let err = service_error(
            GetSecretValueError::InternalServiceError(
                InternalServiceError::builder()
                    .message("An error occurred on the server side.")
                    .build(),
            ),
            500,
        );

        let mapped = map_get_secret_error("prod/db", err);
        assert_eq!(mapped.kind(), SecretErrorKind::Retrieval);
        assert!(!mapped.is_not_found());
    }

    #[test]
    fn test_transport_error_maps_to_retrieval() {
        let err: SdkError<GetSecretValueError> = SdkError::construction_failure("invalid endpoint");

        let mapped = map_get_secret_error("prod/db", err);
        match mapped {
            SecretError::Retrieval {
                identifier,
                message,
                source,
            } => {
                assert_eq!(identifier, "prod/db");
                assert!(message.contains("AWS Secrets Manager error"));
                assert!(source.is_some());
            }
            other => panic!("Expected Retrieval, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_mode_fails_before_config_load() {
        // No region or credentials are needed: the mode is rejected first
        let ctx = FetchContext::background();
        let err = retrieve_secret(&ctx, "prod/db", "yaml", "").await.unwrap_err();
        assert_eq!(err.kind(), SecretErrorKind::UnsupportedMode);
    }

    #[tokio::test]
    async fn test_blank_identifier_is_not_found_without_config() {
        // Rejected before any configuration or network step
        let ctx = FetchContext::background();
        let err = retrieve_secret(&ctx, "", "json", "a").await.unwrap_err();
        assert_eq!(err.kind(), SecretErrorKind::NotFound);
        assert!(err.is_not_found());

        let request: SecretRequest =
            serde_json::from_str(r#"{"identifier": "  ", "mode": "plaintext"}"#).unwrap();
        let config = AwsStoreConfig::default().with_endpoint_url("http://127.0.0.1:9");
        let err = retrieve_secret_with(&ctx, &request, &config).await.unwrap_err();
        assert_eq!(err.kind(), SecretErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_config_load() {
        let ctx = FetchContext::background();
        ctx.cancel();

        let err = retrieve_secret(&ctx, "prod/db", "json", "password")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), SecretErrorKind::Cancelled);
    }
}
