//! AWS integration for smfetch
//!
//! Provides the AWS Secrets Manager [`SecretStore`](smfetch_secrets::SecretStore)
//! and the one-call [`retrieve_secret`] entry point:
//!
//! ```ignore
//! use smfetch_aws::retrieve_secret;
//! use smfetch_secrets::FetchContext;
//!
//! let ctx = FetchContext::with_timeout(std::time::Duration::from_secs(10));
//! let values = retrieve_secret(&ctx, "prod/db", "json", "password").await?;
//! ```
//!
//! Region, credentials and profile come from the standard AWS chain; see
//! [`config`] for the `SMFETCH_AWS_*` overrides.

pub mod config;
pub mod secrets;

// Re-export main types for convenience
pub use config::{AwsStoreConfig, load_sdk_config, secrets_client};
pub use secrets::{AwsSecretStore, retrieve_secret, retrieve_secret_with};
