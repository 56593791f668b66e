//! Per-call description of which secret to fetch and how to read it

use crate::{SecretError, SecretMode};
use serde::{Deserialize, Serialize};

/// A single secret lookup.
///
/// Constructed per call and discarded afterwards. Can be carried as a
/// camelCase JSON document:
///
/// ```json
/// {"identifier": "prod/db", "mode": "json", "fieldName": "password"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretRequest {
    /// Secret ID - can be ARN or secret name
    pub identifier: String,

    /// How to interpret the payload
    pub mode: SecretMode,

    /// Field to extract (JSON) or output key (plaintext)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    /// Version ID (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    /// Version stage (optional, store default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_stage: Option<String>,
}

impl SecretRequest {
    /// Create a request with no field name
    #[must_use]
    pub fn new(identifier: impl Into<String>, mode: SecretMode) -> Self {
        Self {
            identifier: identifier.into(),
            mode,
            field_name: None,
            version_id: None,
            version_stage: None,
        }
    }

    /// Build a request from the raw string arguments of a fetch call.
    ///
    /// An empty `field_name` means no field was given.
    ///
    /// # Errors
    /// Returns [`SecretError::UnsupportedMode`] if `mode` is neither
    /// `"plaintext"` nor `"json"`, and [`SecretError::NotFound`] for a blank
    /// identifier.
    pub fn parse(identifier: &str, mode: &str, field_name: &str) -> Result<Self, SecretError> {
        let mode = mode.parse::<SecretMode>()?;
        let request = Self::new(identifier, mode);
        request.validate()?;
        Ok(if field_name.is_empty() {
            request
        } else {
            request.with_field(field_name)
        })
    }

    /// Reject requests no store could resolve.
    ///
    /// # Errors
    /// Returns [`SecretError::NotFound`] if the identifier is empty or only
    /// whitespace.
    pub fn validate(&self) -> Result<(), SecretError> {
        if self.identifier.trim().is_empty() {
            return Err(SecretError::NotFound {
                identifier: self.identifier.clone(),
                source: None,
            });
        }
        Ok(())
    }

    /// Set the field name
    #[must_use]
    pub fn with_field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Pin a specific version
    #[must_use]
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Select a staging label such as `AWSPREVIOUS`
    #[must_use]
    pub fn with_version_stage(mut self, version_stage: impl Into<String>) -> Self {
        self.version_stage = Some(version_stage.into());
        self
    }

    /// The field name, treating an empty string as absent
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field_name.as_deref().filter(|f| !f.is_empty())
    }

    /// Key under which a plaintext value is returned.
    ///
    /// The field name verbatim, or `""` when none was given.
    #[must_use]
    pub fn output_key(&self) -> &str {
        self.field_name.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecretErrorKind;

    #[test]
    fn test_parse_with_field() {
        let request = SecretRequest::parse("prod/db", "json", "password").unwrap();
        assert_eq!(request.identifier, "prod/db");
        assert_eq!(request.mode, SecretMode::Json);
        assert_eq!(request.field(), Some("password"));
        assert!(request.version_id.is_none());
    }

    #[test]
    fn test_parse_empty_field_is_absent() {
        let request = SecretRequest::parse("prod/db", "json", "").unwrap();
        assert!(request.field_name.is_none());
        assert_eq!(request.field(), None);
        assert_eq!(request.output_key(), "");
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let err = SecretRequest::parse("prod/db", "yaml", "").unwrap_err();
        assert_eq!(err.kind(), SecretErrorKind::UnsupportedMode);
    }

    #[test]
    fn test_parse_blank_identifier_is_not_found() {
        for identifier in ["", "   ", "\t\n"] {
            let err = SecretRequest::parse(identifier, "json", "a").unwrap_err();
            assert_eq!(err.kind(), SecretErrorKind::NotFound, "{identifier:?}");
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn test_validate_deserialized_blank_identifier() {
        let json = r#"{"identifier": "", "mode": "plaintext"}"#;
        let request: SecretRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.validate().unwrap_err().kind(), SecretErrorKind::NotFound);
        assert!(SecretRequest::new("token", SecretMode::Plaintext).validate().is_ok());
    }

    #[test]
    fn test_output_key_uses_field_name() {
        let request = SecretRequest::new("token", SecretMode::Plaintext).with_field("plaintext");
        assert_eq!(request.output_key(), "plaintext");
    }

    #[test]
    fn test_version_builders() {
        let request = SecretRequest::new("token", SecretMode::Plaintext)
            .with_version_id("v1")
            .with_version_stage("AWSPREVIOUS");
        assert_eq!(request.version_id.as_deref(), Some("v1"));
        assert_eq!(request.version_stage.as_deref(), Some("AWSPREVIOUS"));
    }

    #[test]
    fn test_request_serialization() {
        let request = SecretRequest::new("arn:aws:secretsmanager:us-east-1:123456:secret:db", SecretMode::Json)
            .with_field("password");

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("fieldName"));
        assert!(!json.contains("versionId"));

        let parsed: SecretRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, parsed);
    }

    #[test]
    fn test_request_deserialization_defaults() {
        let json = r#"{"identifier": "token", "mode": "plaintext"}"#;
        let request: SecretRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.mode, SecretMode::Plaintext);
        assert!(request.field_name.is_none());
        assert!(request.version_stage.is_none());
    }
}
