//! LLM provider layer for Trendscribe.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — trait that all reasoning backends implement
//! - [`http_provider::HttpProvider`] — OpenAI-compatible HTTP client

pub mod http_provider;
pub mod traits;

pub use http_provider::{HttpProvider, DEFAULT_TIMEOUT};
pub use traits::{LlmProvider, LlmRequestConfig, ProviderError};
