//! Request and error bodies that never leave the HTTP adapter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Error body. `detail` is a string for handled errors and a list for validation errors.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorResponse {
    /// Human-readable message, `None` when the body carries nothing useful.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"detail":"You have already checked in today."}"#).unwrap();
        assert_eq!(
            body.message().as_deref(),
            Some("You have already checked in today.")
        );
    }

    #[test]
    fn test_validation_detail_list() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"detail":[{"loc":["body","content"],"msg":"field required","type":"missing"},
                          {"loc":["body","mood"],"msg":"invalid mood","type":"enum"}]}"#,
        )
        .unwrap();
        assert_eq!(body.message().as_deref(), Some("field required; invalid mood"));
    }

    #[test]
    fn test_missing_detail() {
        let body: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert!(body.message().is_none());
    }

    #[test]
    fn test_chat_request_shape() {
        let json = serde_json::to_string(&ChatRequest { message: "hi" }).unwrap();
        assert_eq!(json, r#"{"message":"hi"}"#);
    }
}
