use serde::{Deserialize, Serialize};

/// Listing price as callers send it: a JSON string or a JSON number,
/// preserved unchanged in responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProductPrize {
    Text(String),
    Number(serde_json::Number),
}

/// A chat message as stored: one item per `(chat_id, ts)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub chat_id: String,
    pub ts: String,
    pub user_id: String,
    pub text: String,
}

/// The message fields exposed to callers. The chat is already named in
/// the request path, so `chat_id` is projected away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageView {
    pub ts: String,
    pub user_id: String,
    pub text: String,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        Self {
            ts: message.ts,
            user_id: message.user_id,
            text: message.text,
        }
    }
}

/// Caller-supplied fields of a new message; `ts` is assigned at insert
/// time, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMessage {
    pub user_id: String,
    pub text: String,
}

/// A classified ad as stored and as returned. Every field is part of
/// the public schema, so the stored record doubles as the response
/// projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ad {
    pub ad_id: String,
    pub ts: String,
    pub user_id: String,
    pub product_title: String,
    pub product_description: String,
    pub product_prize: ProductPrize,
}

/// Caller-supplied fields of a new ad; `ad_id` and `ts` are assigned
/// at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAd {
    pub user_id: String,
    pub product_title: String,
    pub product_description: String,
    pub product_prize: ProductPrize,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_message_requires_both_fields() {
        let error = serde_json::from_value::<NewMessage>(json!({"user_id": "u1"}))
            .expect_err("missing text should fail");
        assert!(error.to_string().contains("text"));
    }

    #[test]
    fn prize_accepts_string_and_number() {
        let from_string: ProductPrize =
            serde_json::from_value(json!("120")).expect("string prize should parse");
        assert_eq!(from_string, ProductPrize::Text("120".to_string()));

        let from_number: ProductPrize =
            serde_json::from_value(json!(120.5)).expect("number prize should parse");
        assert!(matches!(from_number, ProductPrize::Number(_)));
    }

    #[test]
    fn prize_rejects_other_json_types() {
        serde_json::from_value::<ProductPrize>(json!(true)).expect_err("bool prize should fail");
        serde_json::from_value::<ProductPrize>(json!(["12"])).expect_err("array prize should fail");
    }
}
