//! Ambient AWS configuration for Secrets Manager access

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use serde::{Deserialize, Serialize};
use smfetch_secrets::SecretError;

/// Region override, takes precedence over `AWS_REGION` and shared config
pub const REGION_ENV: &str = "SMFETCH_AWS_REGION";
/// Named profile from the shared config files
pub const PROFILE_ENV: &str = "SMFETCH_AWS_PROFILE";
/// Custom Secrets Manager endpoint (LocalStack, VPC endpoints, ...)
pub const ENDPOINT_ENV: &str = "SMFETCH_AWS_ENDPOINT_URL";

/// Overrides applied on top of the standard AWS configuration chain
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsStoreConfig {
    /// Region (optional, defaults to the AWS chain)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Shared config profile (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Secrets Manager endpoint override (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl AwsStoreConfig {
    /// Read overrides from `SMFETCH_AWS_*` environment variables.
    ///
    /// Unset or blank variables leave the field empty.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            region: non_blank_env(REGION_ENV),
            profile: non_blank_env(PROFILE_ENV),
            endpoint_url: non_blank_env(ENDPOINT_ENV),
        }
    }

    /// Set the region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the endpoint override
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Resolve region and credentials from the environment, shared config files,
/// and instance metadata, applying `config` overrides.
///
/// Credentials are resolved eagerly so that auth problems surface here.
///
/// # Errors
/// Returns [`SecretError::ConfigLoad`] if no region is configured or
/// credentials cannot be resolved.
pub async fn load_sdk_config(config: &AwsStoreConfig) -> Result<SdkConfig, SecretError> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let sdk_config = loader.load().await;

    let region = sdk_config.region().ok_or_else(|| {
        SecretError::config_load(format!(
            "no AWS region configured (set AWS_REGION or {REGION_ENV})"
        ))
    })?;

    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| SecretError::config_load("no AWS credentials provider available"))?;

    provider
        .provide_credentials()
        .await
        .map_err(|e| SecretError::ConfigLoad {
            message: format!("failed to resolve AWS credentials: {}", DisplayErrorContext(&e)),
            source: Some(Box::new(e)),
        })?;

    tracing::debug!(
        region = %region,
        profile = ?config.profile,
        endpoint = ?config.endpoint_url,
        "Loaded AWS configuration"
    );

    Ok(sdk_config)
}

/// Build a Secrets Manager client, honouring the endpoint override.
#[must_use]
pub fn secrets_client(sdk_config: &SdkConfig, config: &AwsStoreConfig) -> aws_sdk_secretsmanager::Client {
    let mut builder = aws_sdk_secretsmanager::config::Builder::from(sdk_config);
    if let Some(endpoint) = config.endpoint_url.as_deref() {
        builder = builder.endpoint_url(endpoint);
    }
    aws_sdk_secretsmanager::Client::from_conf(builder.build())
}
