//! Uploaded files passed to the model as data URIs.

use crate::error::{Result, SprintError};
use base64::Engine;
use serde::Serialize;

/// A file supplied as `data:<mimetype>;base64,<encoded_data>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub mime_type: String,
    /// Whether the payload is base64 encoded.
    pub base64: bool,
    /// The full data URI, as received.
    pub data_uri: String,
}

impl Attachment {
    /// Parse a data URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| SprintError::InvalidInput("file must be a data URI".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| SprintError::InvalidInput("data URI has no payload".to_string()))?;
        if payload.is_empty() {
            return Err(SprintError::InvalidInput("data URI payload is empty".to_string()));
        }

        let mut parts = meta.split(';');
        let mime_type = match parts.next() {
            Some(m) if !m.is_empty() => m.to_ascii_lowercase(),
            _ => "text/plain".to_string(),
        };
        let base64 = parts.any(|p| p.eq_ignore_ascii_case("base64"));
        if base64 {
            base64::engine::general_purpose::STANDARD
                .decode(payload.as_bytes())
                .map_err(|e| {
                    SprintError::InvalidInput(format!("data URI payload is not valid base64: {}", e))
                })?;
        }

        Ok(Self {
            mime_type,
            base64,
            data_uri: uri.to_string(),
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// The raw payload, for plain-text URIs that are not base64 encoded.
    pub fn inline_text(&self) -> Option<&str> {
        if self.base64 || !self.mime_type.starts_with("text/") {
            return None;
        }
        self.data_uri.split_once(',').map(|(_, payload)| payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_uri() {
        let a = Attachment::from_data_uri("data:image/PNG;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(a.mime_type, "image/png");
        assert!(a.base64);
        assert!(a.is_image());
        assert!(a.inline_text().is_none());
    }

    #[test]
    fn test_parse_plain_text_uri() {
        let a = Attachment::from_data_uri("data:,hello%20world").unwrap();
        assert_eq!(a.mime_type, "text/plain");
        assert!(!a.base64);
        assert_eq!(a.inline_text(), Some("hello%20world"));
    }

    #[test]
    fn test_rejects_non_data_uri() {
        assert!(Attachment::from_data_uri("https://example.com/a.pdf").is_err());
        assert!(Attachment::from_data_uri("data:application/pdf;base64").is_err());
        assert!(Attachment::from_data_uri("data:application/pdf;base64,").is_err());
    }

    #[test]
    fn test_rejects_malformed_base64_payload() {
        let err = Attachment::from_data_uri("data:image/png;base64,not base64!!").unwrap_err();
        assert!(matches!(err, SprintError::InvalidInput(_)));
        assert!(Attachment::from_data_uri("data:image/png;base64,iVBORw0KGgo").is_err());
    }
}
