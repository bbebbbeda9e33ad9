//! Azure Resource Graph client module
//!
//! This module provides authenticated, paginated query execution against
//! the Resource Graph API, with retry of transient failures.

mod client;
mod credentials;
pub mod models;
pub mod retry;

pub use client::ResourceGraphClient;
pub use credentials::{token_expiry, TokenResolver};
pub use models::{QueryOptions, QueryPage, QueryRequest, QueryResult, Row};
pub use retry::{with_retry, RetryPolicy};
