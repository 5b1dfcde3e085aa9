use agora_core::records::{Ad, Message};

/// One page of an ads table scan. `next_token` carries the opaque
/// continuation marker of the page; `None` means the scan is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct AdScanPage {
    pub ads: Vec<Ad>,
    pub next_token: Option<String>,
}

/// Outcome of a conditional ad delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdDeletion {
    Deleted,
    NotFound,
}

pub trait MessageStore {
    fn query_messages(&self, chat_id: &str) -> Result<Vec<Message>, String>;
    fn put_message(&self, message: &Message) -> Result<(), String>;
}

pub trait AdStore {
    fn put_ad(&self, ad: &Ad) -> Result<(), String>;
    fn get_ad(&self, ad_id: &str) -> Result<Option<Ad>, String>;
    fn delete_ad(&self, ad_id: &str) -> Result<AdDeletion, String>;
    fn scan_ads(&self, start_token: Option<String>) -> Result<AdScanPage, String>;
}
