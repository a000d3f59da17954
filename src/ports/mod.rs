//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Generative-text provider (Gemini, mock)
//! - `ParameterSynthesizer` - Session setup from a problem statement
//! - `OptionComparator` - Scored comparison of options
//! - `SessionRepository` - Session storage

mod ai_provider;
mod option_comparator;
mod parameter_synthesizer;
mod session_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use option_comparator::OptionComparator;
pub use parameter_synthesizer::ParameterSynthesizer;
pub use session_repository::{SessionRepository, SessionUpdate};
