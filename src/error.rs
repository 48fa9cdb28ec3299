use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum FigdomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl FigdomError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        FigdomError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn document(message: impl Into<String>) -> Self {
        FigdomError::Document(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            FigdomError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            FigdomError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            FigdomError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify api.base_url in the config (e.g., https://api.figma.com).",
            ),
            FigdomError::FigmaApi { status, message } => {
                let remediation = match status.map(|s| s.as_u16()) {
                    Some(401) | Some(403) => {
                        "Check FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) and its access to the file."
                    }
                    Some(404) => "Verify the file key; it is the segment after /file/ in the URL.",
                    Some(429) => "Rate limited; retry after waiting.",
                    _ => "Check FIGMA_TOKEN/file key and rate limits; retry after waiting.",
                };
                ErrorPayload::new(
                    ErrorCategory::Figma,
                    format!("Figma API error (status {:?}): {}", status, message),
                    remediation,
                )
            }
            FigdomError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Document,
                e.to_string(),
                "Check the JSON input is a Figma file response; run with --verbose for details.",
            ),
            FigdomError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("figma_token") || lower.contains("figma token") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) or pass --token.",
                    )
                } else if lower.contains("toml") || lower.contains("config file") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Fix the config file syntax or remove it to fall back to defaults.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and config values.",
                    )
                }
            }
            FigdomError::Document(msg) => ErrorPayload::new(
                ErrorCategory::Document,
                msg.to_string(),
                "Verify the document contains a renderable root node.",
            ),
            FigdomError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, FigdomError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
    Document,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_payload_includes_token_remediation() {
        let err = FigdomError::Config("FIGMA_TOKEN environment variable is required".to_string());
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Config);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("--token"),
            "expected token remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = FigdomError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("Check flags/paths"));
    }

    #[test]
    fn figma_not_found_points_at_file_key() {
        let err = FigdomError::figma_api(Some(StatusCode::NOT_FOUND), "Not found");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Figma);
        assert!(payload.message.contains("Not found"));
        assert!(payload
            .remediation
            .unwrap_or_default()
            .contains("file key"));
    }

    #[test]
    fn figma_forbidden_points_at_token() {
        let err = FigdomError::figma_api(Some(StatusCode::FORBIDDEN), "Invalid token");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("FIGMA_TOKEN"));
    }

    #[test]
    fn serialization_errors_are_document_errors() {
        let err: FigdomError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.to_payload().category, ErrorCategory::Document);
    }

    #[test]
    fn payload_serializes_lowercase_category() {
        let payload = FigdomError::document("empty document").to_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["category"], "document");
        assert_eq!(json["message"], "empty document");
    }
}
