//! Microsoft Graph wire models

use serde::Deserialize;
use serde_json::Value;

/// One page of a Graph collection response
///
/// Only `value` is consumed; paging is driven by `$top`/`$skip`. A body
/// without `value` is not a collection page and fails to deserialize.
#[derive(Debug, Deserialize)]
pub struct CollectionPage {
    pub value: Vec<Value>,

    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Graph error envelope: `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Extract a readable message from an error response body
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.code.is_empty() => {
            format!("{}: {}", envelope.error.code, envelope.error.message)
        }
        _ => body.chars().take(500).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_without_value_is_rejected() {
        assert!(serde_json::from_str::<CollectionPage>(r#"{"@odata.context": "x"}"#).is_err());
        assert!(serde_json::from_str::<CollectionPage>(r#"{"message": "gateway"}"#).is_err());
    }

    #[test]
    fn test_empty_page() {
        let page: CollectionPage = serde_json::from_str(r#"{"value": []}"#).unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error": {"code": "Request_ResourceNotFound", "message": "Not found"}}"#;
        assert_eq!(error_message(body), "Request_ResourceNotFound: Not found");
        assert_eq!(error_message("plain text"), "plain text");
    }
}
