//! Uniform response envelope returned by every endpoint

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ success, message, data? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseEnvelope {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Pair with a status code for use as a handler return value
    pub fn with_status(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_omits_data() {
        let value = serde_json::to_value(ResponseEnvelope::failure("No data provided")).unwrap();
        assert_eq!(value, json!({"success": false, "message": "No data provided"}));
    }

    #[test]
    fn ok_carries_data() {
        let value = serde_json::to_value(ResponseEnvelope::ok("fine", json!([]))).unwrap();
        assert_eq!(value, json!({"success": true, "message": "fine", "data": []}));
    }
}
