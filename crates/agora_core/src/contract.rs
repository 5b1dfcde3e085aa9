use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::records::{Ad, MessageView};

/// Response shape handed back to the invoking runtime: an HTTP status
/// code, headers, and a JSON-encoded body string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageListBody {
    pub status: u16,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdListBody {
    pub status: u16,
    pub ads: Vec<Ad>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdItemBody {
    pub status: u16,
    pub ad: Ad,
}

/// Body of a successful write. `ad_id` is present on ad creation only,
/// carrying the server-assigned identifier back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedBody {
    pub status: u16,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletedBody {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotFoundBody {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Extract a path parameter from the invocation event.
pub fn path_parameter<'a>(event: &'a Value, name: &str) -> Option<&'a str> {
    event
        .get("pathParameters")
        .and_then(Value::as_object)
        .and_then(|params| params.get(name))
        .and_then(Value::as_str)
}

/// Normalize the event body into a JSON value. API Gateway proxy
/// integrations deliver a JSON-encoded string; direct invocations may
/// carry an object or no body at all. A missing or null body becomes
/// `{}`, which then fails required-field deserialization downstream.
pub fn json_body(event: &Value) -> Result<Value, ValidationError> {
    let Some(body) = event.get("body") else {
        return Ok(json!({}));
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => serde_json::from_str(text)
            .map_err(|error| ValidationError::new(format!("Malformed JSON body: {error}"))),
        _ => Err(ValidationError::new("Request body must be a JSON object")),
    }
}

/// Deserialize the event body into its typed payload.
pub fn parse_body<T: DeserializeOwned>(event: &Value) -> Result<T, ValidationError> {
    let body = json_body(event)?;
    serde_json::from_value(body)
        .map_err(|error| ValidationError::new(format!("Malformed request: {error}")))
}

fn json_response(status_code: u16, body: String) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body,
    }
}

pub fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    json_response(
        status_code,
        serde_json::to_string(&payload).expect("response payload should serialize"),
    )
}

pub fn not_found_response(
    title: impl Into<String>,
    detail: impl Into<String>,
) -> ApiGatewayResponse {
    success_response(
        404,
        NotFoundBody {
            status: 404,
            title: title.into(),
            detail: detail.into(),
        },
    )
}

pub fn internal_error_response(message: &str) -> ApiGatewayResponse {
    json_response(500, json!({"error": message}).to_string())
}

#[cfg(test)]
mod tests {
    use crate::records::NewMessage;

    use super::*;

    #[test]
    fn reads_path_parameter_when_present() {
        let event = json!({"pathParameters": {"chat_id": "c1"}});
        assert_eq!(path_parameter(&event, "chat_id"), Some("c1"));
        assert_eq!(path_parameter(&event, "ad_id"), None);
    }

    #[test]
    fn missing_path_parameters_map_yields_none() {
        assert_eq!(path_parameter(&json!({}), "chat_id"), None);
    }

    #[test]
    fn missing_body_normalizes_to_empty_object() {
        let body = json_body(&json!({})).expect("missing body should normalize");
        assert_eq!(body, json!({}));

        let error = serde_json::from_value::<NewMessage>(body)
            .expect_err("empty body should fail required-field parsing");
        assert!(error.to_string().contains("user_id"));
    }

    #[test]
    fn string_body_is_decoded() {
        let event = json!({"body": "{\"user_id\":\"u1\",\"text\":\"hi\"}"});
        let payload: NewMessage = parse_body(&event).expect("body should parse");
        assert_eq!(payload.user_id, "u1");
        assert_eq!(payload.text, "hi");
    }

    #[test]
    fn malformed_string_body_is_rejected() {
        let event = json!({"body": "{not json"});
        let error = json_body(&event).expect_err("malformed body should fail");
        assert!(error.message().starts_with("Malformed JSON body"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let event = json!({"body": [1, 2, 3]});
        let error = json_body(&event).expect_err("array body should fail");
        assert_eq!(error.message(), "Request body must be a JSON object");
    }

    #[test]
    fn not_found_response_carries_structured_body() {
        let response = not_found_response("Chat not found", "Chat c1 not found in database");
        assert_eq!(response.status_code, 404);

        let body: NotFoundBody =
            serde_json::from_str(&response.body).expect("body should decode");
        assert_eq!(body.status, 404);
        assert_eq!(body.title, "Chat not found");
        assert_eq!(body.detail, "Chat c1 not found in database");
    }

    #[test]
    fn internal_error_response_echoes_fault_text() {
        let response = internal_error_response("store unavailable");
        assert_eq!(response.status_code, 500);

        let body: Value = serde_json::from_str(&response.body).expect("body should decode");
        assert_eq!(body, json!({"error": "store unavailable"}));
    }
}
