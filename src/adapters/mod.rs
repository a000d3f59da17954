//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generative-text providers (Gemini, mock)
//! - `analysis` - Synthesizer and comparator built on an `AIProvider`
//! - `http` - Axum REST API
//! - `storage` - Session persistence (in-memory)

pub mod ai;
pub mod analysis;
pub mod http;
pub mod storage;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider};
pub use analysis::{LlmOptionComparator, LlmParameterSynthesizer};
pub use http::{referee_router, RefereeAppState};
pub use storage::InMemorySessionRepository;
