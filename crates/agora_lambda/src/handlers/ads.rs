//! Handlers for the classified ad functions.
//!
//! Ads are keyed by a server-assigned id: `handle_send_ad` draws a
//! fresh UUID per invocation and stores the record behind an existence
//! guard, so concurrent creates can never overwrite each other.
//! `handle_get_ads` walks the full table page by page before deciding
//! between a listing and a 404. Deletion is a single conditional call;
//! a failed condition is reported as 404, not as a fault.

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use agora_core::contract::{
    internal_error_response, not_found_response, parse_body, path_parameter, success_response,
    AdItemBody, AdListBody, ApiGatewayResponse, CreatedBody, DeletedBody,
};
use agora_core::records::{Ad, NewAd};

use crate::adapters::store::{AdDeletion, AdStore};

pub fn handle_send_ad(event: Value, store: &impl AdStore) -> ApiGatewayResponse {
    log_info("send_ad_received", json!({}));

    let payload = match parse_body::<NewAd>(&event) {
        Ok(value) => value,
        Err(error) => {
            log_error("send_ad_rejected", json!({"error": error.message()}));
            return internal_error_response(error.message());
        }
    };

    let ad = Ad {
        ad_id: Uuid::new_v4().to_string(),
        ts: Utc::now().to_rfc3339(),
        user_id: payload.user_id,
        product_title: payload.product_title,
        product_description: payload.product_description,
        product_prize: payload.product_prize,
    };

    if let Err(error) = store.put_ad(&ad) {
        log_error("send_ad_failed", json!({"ad_id": ad.ad_id, "error": error}));
        return internal_error_response(&error);
    }

    log_info("ad_posted", json!({"ad_id": ad.ad_id, "user_id": ad.user_id}));
    success_response(
        201,
        CreatedBody {
            status: 201,
            title: "OK".to_string(),
            detail: format!("New ad {} posted", ad.ad_id),
            ad_id: Some(ad.ad_id),
        },
    )
}

pub fn handle_get_ads(store: &impl AdStore) -> ApiGatewayResponse {
    log_info("get_ads_received", json!({}));

    let mut ads = Vec::new();
    let mut token = None;

    loop {
        let page = match store.scan_ads(token.take()) {
            Ok(value) => value,
            Err(error) => {
                log_error(
                    "get_ads_failed",
                    json!({"ads_seen": ads.len(), "error": error}),
                );
                return internal_error_response(&error);
            }
        };

        ads.extend(page.ads);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    if ads.is_empty() {
        return not_found_response("Ads not found", "No ads found in database");
    }

    success_response(200, AdListBody { status: 200, ads })
}

pub fn handle_get_ad(event: Value, store: &impl AdStore) -> ApiGatewayResponse {
    let ad_id = path_parameter(&event, "ad_id").unwrap_or_default();
    log_info("get_ad_received", json!({"ad_id": ad_id}));

    match store.get_ad(ad_id) {
        Ok(Some(ad)) => success_response(200, AdItemBody { status: 200, ad }),
        Ok(None) => not_found_response("Ad not found", format!("Ad {ad_id} not found in database")),
        Err(error) => {
            log_error("get_ad_failed", json!({"ad_id": ad_id, "error": error}));
            internal_error_response(&error)
        }
    }
}

pub fn handle_delete_ad(event: Value, store: &impl AdStore) -> ApiGatewayResponse {
    let ad_id = path_parameter(&event, "ad_id").unwrap_or_default();
    log_info("delete_ad_received", json!({"ad_id": ad_id}));

    match store.delete_ad(ad_id) {
        Ok(AdDeletion::Deleted) => {
            log_info("ad_deleted", json!({"ad_id": ad_id}));
            success_response(
                200,
                DeletedBody {
                    status: 200,
                    body: format!("Ad {ad_id} deleted"),
                },
            )
        }
        Ok(AdDeletion::NotFound) => {
            not_found_response("Ad not found", format!("Ad {ad_id} not found in database"))
        }
        Err(error) => {
            log_error("delete_ad_failed", json!({"ad_id": ad_id, "error": error}));
            internal_error_response(&error)
        }
    }
}

fn log_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "ad_handler",
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
            "component": "ad_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
