//! AWS integration for the chat and classifieds API.
//!
//! This crate hosts the Lambda-facing side of the system: store adapter
//! traits with their DynamoDB implementations, and the per-function
//! request handlers. Each deployed function has a dedicated binary under
//! `src/bin/` that wires a handler to its table through the runtime.
//! The handlers themselves are synchronous and store-agnostic so they
//! can be exercised against in-memory stores in tests.

pub mod adapters;
pub mod handlers;
