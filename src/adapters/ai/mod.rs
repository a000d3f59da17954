//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing and offline runs
//! - `GeminiProvider` - Google Gemini `generateContent` API

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{
    retry_backoff, worst_case_call, GeminiConfig, GeminiProvider, DEFAULT_ANALYSIS_MODEL,
    DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
