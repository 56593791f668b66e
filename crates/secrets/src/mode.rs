//! How a fetched secret payload is interpreted

use crate::SecretError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interpretation of the raw secret payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretMode {
    /// The whole payload is the value
    Plaintext,
    /// The payload is a JSON object; one or all string fields are extracted
    Json,
}

impl SecretMode {
    /// Wire name of the mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Json => "json",
        }
    }
}

impl FromStr for SecretMode {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plaintext" => Ok(Self::Plaintext),
            "json" => Ok(Self::Json),
            other => Err(SecretError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SecretMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
