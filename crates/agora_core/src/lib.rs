//! Shared chat/classifieds request and response contracts.
//!
//! This crate owns the invocation-event parsing helpers, the response
//! envelope schema, and the stored-record/view types for both handler
//! families. It intentionally excludes AWS SDK and Lambda runtime
//! concerns; those live in `agora_lambda`.

pub mod contract;
pub mod records;
