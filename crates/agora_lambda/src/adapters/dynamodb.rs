//! DynamoDB-backed implementations of the store traits.
//!
//! Each store owns one table name. Messages live in a table keyed by
//! `chat_id` (partition) and `ts` (sort); ads live in a table keyed by
//! `ad_id` alone. The trait methods are synchronous, so the SDK calls
//! run on the current Tokio runtime through `block_in_place`.

use std::collections::HashMap;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use agora_core::records::{Ad, Message, ProductPrize};

use super::store::{AdDeletion, AdScanPage, AdStore, MessageStore};

pub const ATTR_CHAT_ID: &str = "chat_id";
pub const ATTR_AD_ID: &str = "ad_id";
pub const ATTR_TS: &str = "ts";
pub const ATTR_USER_ID: &str = "user_id";
pub const ATTR_TEXT: &str = "text";
pub const ATTR_PRODUCT_TITLE: &str = "product_title";
pub const ATTR_PRODUCT_DESCRIPTION: &str = "product_description";
pub const ATTR_PRODUCT_PRIZE: &str = "product_prize";

pub struct DynamoMessageStore {
    table_name: String,
    client: Client,
}

impl DynamoMessageStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { table_name, client }
    }
}

impl MessageStore for DynamoMessageStore {
    fn query_messages(&self, chat_id: &str) -> Result<Vec<Message>, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let chat_id = chat_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .query()
                    .table_name(table_name)
                    .key_condition_expression("#chat = :chat")
                    .expression_attribute_names("#chat", ATTR_CHAT_ID)
                    .expression_attribute_values(":chat", AttributeValue::S(chat_id))
                    .send()
                    .await
                    .map_err(|error| format!("Failed to query messages: {error}"))?;

                response.items().iter().map(item_to_message).collect()
            })
        })
    }

    fn put_message(&self, message: &Message) -> Result<(), String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let item = message_to_item(message);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table_name)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("Failed to store message: {error}"))
            })
        })
    }
}

pub struct DynamoAdStore {
    table_name: String,
    client: Client,
}

impl DynamoAdStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { table_name, client }
    }
}

impl AdStore for DynamoAdStore {
    fn put_ad(&self, ad: &Ad) -> Result<(), String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let ad_id = ad.ad_id.clone();
        let item = ad_to_item(ad);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let result = client
                    .put_item()
                    .table_name(table_name)
                    .set_item(Some(item))
                    .condition_expression("attribute_not_exists(#id)")
                    .expression_attribute_names("#id", ATTR_AD_ID)
                    .send()
                    .await;

                match result {
                    Ok(_) => Ok(()),
                    Err(error) if is_put_conditional_check_failed(&error) => {
                        Err(format!("Ad id {ad_id} is already taken"))
                    }
                    Err(error) => Err(format!("Failed to store ad: {error}")),
                }
            })
        })
    }

    fn get_ad(&self, ad_id: &str) -> Result<Option<Ad>, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let ad_id = ad_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .get_item()
                    .table_name(table_name)
                    .key(ATTR_AD_ID, AttributeValue::S(ad_id))
                    .send()
                    .await
                    .map_err(|error| format!("Failed to read ad: {error}"))?;

                match response.item() {
                    Some(item) => item_to_ad(item).map(Some),
                    None => Ok(None),
                }
            })
        })
    }

    fn delete_ad(&self, ad_id: &str) -> Result<AdDeletion, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let ad_id = ad_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let result = client
                    .delete_item()
                    .table_name(table_name)
                    .key(ATTR_AD_ID, AttributeValue::S(ad_id))
                    .condition_expression("attribute_exists(#id)")
                    .expression_attribute_names("#id", ATTR_AD_ID)
                    .send()
                    .await;

                match result {
                    Ok(_) => Ok(AdDeletion::Deleted),
                    Err(error) if is_delete_conditional_check_failed(&error) => {
                        Ok(AdDeletion::NotFound)
                    }
                    Err(error) => Err(format!("Failed to delete ad: {error}")),
                }
            })
        })
    }

    fn scan_ads(&self, start_token: Option<String>) -> Result<AdScanPage, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let mut request = client.scan().table_name(table_name);
                if let Some(token) = start_token {
                    request = request.exclusive_start_key(ATTR_AD_ID, AttributeValue::S(token));
                }

                let response = request
                    .send()
                    .await
                    .map_err(|error| format!("Failed to scan ads: {error}"))?;

                let ads = response
                    .items()
                    .iter()
                    .map(item_to_ad)
                    .collect::<Result<Vec<_>, _>>()?;

                let next_token = match response.last_evaluated_key() {
                    Some(key) if !key.is_empty() => {
                        let token = key
                            .get(ATTR_AD_ID)
                            .and_then(|value| value.as_s().ok())
                            .cloned()
                            .ok_or_else(|| {
                                "Scan continuation key is missing the ad id".to_string()
                            })?;
                        Some(token)
                    }
                    _ => None,
                };

                Ok(AdScanPage { ads, next_token })
            })
        })
    }
}

fn is_put_conditional_check_failed(error: &SdkError<PutItemError>) -> bool {
    match error {
        SdkError::ServiceError(service_error) => matches!(
            service_error.err(),
            PutItemError::ConditionalCheckFailedException(_)
        ),
        _ => false,
    }
}

fn is_delete_conditional_check_failed(error: &SdkError<DeleteItemError>) -> bool {
    match error {
        SdkError::ServiceError(service_error) => matches!(
            service_error.err(),
            DeleteItemError::ConditionalCheckFailedException(_)
        ),
        _ => false,
    }
}

fn message_to_item(message: &Message) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ATTR_CHAT_ID.to_string(),
            AttributeValue::S(message.chat_id.clone()),
        ),
        (ATTR_TS.to_string(), AttributeValue::S(message.ts.clone())),
        (
            ATTR_USER_ID.to_string(),
            AttributeValue::S(message.user_id.clone()),
        ),
        (
            ATTR_TEXT.to_string(),
            AttributeValue::S(message.text.clone()),
        ),
    ])
}

fn item_to_message(item: &HashMap<String, AttributeValue>) -> Result<Message, String> {
    Ok(Message {
        chat_id: string_attribute(item, ATTR_CHAT_ID)?,
        ts: string_attribute(item, ATTR_TS)?,
        user_id: string_attribute(item, ATTR_USER_ID)?,
        text: string_attribute(item, ATTR_TEXT)?,
    })
}

fn ad_to_item(ad: &Ad) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (ATTR_AD_ID.to_string(), AttributeValue::S(ad.ad_id.clone())),
        (ATTR_TS.to_string(), AttributeValue::S(ad.ts.clone())),
        (
            ATTR_USER_ID.to_string(),
            AttributeValue::S(ad.user_id.clone()),
        ),
        (
            ATTR_PRODUCT_TITLE.to_string(),
            AttributeValue::S(ad.product_title.clone()),
        ),
        (
            ATTR_PRODUCT_DESCRIPTION.to_string(),
            AttributeValue::S(ad.product_description.clone()),
        ),
        (
            ATTR_PRODUCT_PRIZE.to_string(),
            prize_to_attribute(&ad.product_prize),
        ),
    ])
}

fn item_to_ad(item: &HashMap<String, AttributeValue>) -> Result<Ad, String> {
    let prize = item
        .get(ATTR_PRODUCT_PRIZE)
        .ok_or_else(|| format!("Stored ad is missing attribute '{ATTR_PRODUCT_PRIZE}'"))?;

    Ok(Ad {
        ad_id: string_attribute(item, ATTR_AD_ID)?,
        ts: string_attribute(item, ATTR_TS)?,
        user_id: string_attribute(item, ATTR_USER_ID)?,
        product_title: string_attribute(item, ATTR_PRODUCT_TITLE)?,
        product_description: string_attribute(item, ATTR_PRODUCT_DESCRIPTION)?,
        product_prize: attribute_to_prize(prize)?,
    })
}

fn string_attribute(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, String> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .ok_or_else(|| format!("Stored item is missing string attribute '{name}'"))
}

fn prize_to_attribute(prize: &ProductPrize) -> AttributeValue {
    match prize {
        ProductPrize::Text(text) => AttributeValue::S(text.clone()),
        ProductPrize::Number(number) => AttributeValue::N(number.to_string()),
    }
}

fn attribute_to_prize(value: &AttributeValue) -> Result<ProductPrize, String> {
    match value {
        AttributeValue::S(text) => Ok(ProductPrize::Text(text.clone())),
        AttributeValue::N(number) => {
            if let Ok(integer) = number.parse::<i64>() {
                Ok(ProductPrize::Number(integer.into()))
            } else if let Ok(integer) = number.parse::<u64>() {
                Ok(ProductPrize::Number(integer.into()))
            } else if let Some(float) = number
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                Ok(ProductPrize::Number(float))
            } else {
                Err(format!("Stored prize is not a readable number: {number}"))
            }
        }
        _ => Err("Stored prize is neither a string nor a number".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_round_trips_through_item_attributes() {
        let message = Message {
            chat_id: "chat-7".to_string(),
            ts: "2026-03-01T10:00:00+00:00".to_string(),
            user_id: "user-1".to_string(),
            text: "hello there".to_string(),
        };

        let item = message_to_item(&message);
        assert_eq!(
            item.get(ATTR_CHAT_ID),
            Some(&AttributeValue::S("chat-7".to_string()))
        );

        let restored = item_to_message(&item).expect("item should convert back");
        assert_eq!(restored, message);
    }

    #[test]
    fn item_missing_attribute_is_reported_by_name() {
        let mut item = message_to_item(&Message {
            chat_id: "chat-7".to_string(),
            ts: "2026-03-01T10:00:00+00:00".to_string(),
            user_id: "user-1".to_string(),
            text: "hello".to_string(),
        });
        item.remove(ATTR_TS);

        let error = item_to_message(&item).expect_err("missing ts should fail");
        assert!(error.contains("'ts'"), "unexpected error: {error}");
    }

    #[test]
    fn numeric_prize_is_stored_as_number_attribute() {
        let ad = Ad {
            ad_id: "ad-1".to_string(),
            ts: "2026-03-01T10:00:00+00:00".to_string(),
            user_id: "user-1".to_string(),
            product_title: "City bike".to_string(),
            product_description: "Three gears, working lights".to_string(),
            product_prize: ProductPrize::Number(serde_json::Number::from(120)),
        };

        let item = ad_to_item(&ad);
        assert_eq!(
            item.get(ATTR_PRODUCT_PRIZE),
            Some(&AttributeValue::N("120".to_string()))
        );

        let restored = item_to_ad(&item).expect("item should convert back");
        assert_eq!(restored, ad);
    }

    #[test]
    fn textual_prize_survives_as_string_attribute() {
        let prize = attribute_to_prize(&AttributeValue::S("negotiable".to_string()))
            .expect("string prize should convert");
        assert_eq!(prize, ProductPrize::Text("negotiable".to_string()));

        let error = attribute_to_prize(&AttributeValue::Bool(true))
            .expect_err("boolean prize should be rejected");
        assert!(error.contains("neither"), "unexpected error: {error}");
    }

    #[test]
    fn integer_prize_beyond_i64_round_trips_exactly() {
        let prize = attribute_to_prize(&AttributeValue::N("18446744073709551615".to_string()))
            .expect("u64 prize should convert");
        assert_eq!(prize, ProductPrize::Number(serde_json::Number::from(u64::MAX)));
    }

    #[test]
    fn fractional_prize_number_is_preserved() {
        let prize = attribute_to_prize(&AttributeValue::N("19.99".to_string()))
            .expect("decimal prize should convert");
        assert_eq!(
            prize,
            ProductPrize::Number(serde_json::Number::from_f64(19.99).expect("finite"))
        );
    }
}
