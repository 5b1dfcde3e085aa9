//! Handlers for the chat message functions.
//!
//! `handle_get_messages` lists a chat, `handle_send_message` appends to
//! one. Both are total: every invocation produces a response envelope,
//! with store and validation faults mapped to a 500 body.

use chrono::Utc;
use serde_json::{json, Value};

use agora_core::contract::{
    internal_error_response, not_found_response, parse_body, path_parameter, success_response,
    ApiGatewayResponse, CreatedBody, MessageListBody,
};
use agora_core::records::{Message, MessageView, NewMessage};

use crate::adapters::store::MessageStore;

pub fn handle_get_messages(event: Value, store: &impl MessageStore) -> ApiGatewayResponse {
    let chat_id = path_parameter(&event, "chat_id").unwrap_or_default();
    log_info("get_messages_received", json!({"chat_id": chat_id}));

    // An empty partition key value can never match; DynamoDB rejects it
    // in a key condition, so it never reaches the query.
    if chat_id.is_empty() {
        return not_found_response("Chat not found", "Chat not found in database");
    }

    let messages = match store.query_messages(chat_id) {
        Ok(value) => value,
        Err(error) => {
            log_error(
                "get_messages_failed",
                json!({"chat_id": chat_id, "error": error}),
            );
            return internal_error_response(&error);
        }
    };

    if messages.is_empty() {
        return not_found_response(
            "Chat not found",
            format!("Chat {chat_id} not found in database"),
        );
    }

    let body = MessageListBody {
        status: 200,
        messages: messages.into_iter().map(MessageView::from).collect(),
    };
    success_response(200, body)
}

pub fn handle_send_message(event: Value, store: &impl MessageStore) -> ApiGatewayResponse {
    let Some(chat_id) = path_parameter(&event, "chat_id") else {
        log_error("send_message_rejected", json!({"error": "missing chat_id"}));
        return internal_error_response("chat_id path parameter is required");
    };
    log_info("send_message_received", json!({"chat_id": chat_id}));

    let payload = match parse_body::<NewMessage>(&event) {
        Ok(value) => value,
        Err(error) => {
            log_error(
                "send_message_rejected",
                json!({"chat_id": chat_id, "error": error.message()}),
            );
            return internal_error_response(error.message());
        }
    };

    let message = Message {
        chat_id: chat_id.to_string(),
        ts: Utc::now().to_rfc3339(),
        user_id: payload.user_id,
        text: payload.text,
    };

    if let Err(error) = store.put_message(&message) {
        log_error(
            "send_message_failed",
            json!({"chat_id": chat_id, "error": error}),
        );
        return internal_error_response(&error);
    }

    log_info(
        "message_posted",
        json!({"chat_id": message.chat_id, "ts": message.ts}),
    );
    success_response(
        201,
        CreatedBody {
            status: 201,
            title: "OK".to_string(),
            detail: format!("New message posted into chat {}", message.chat_id),
            ad_id: None,
        },
    )
}

fn log_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "message_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "message_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
