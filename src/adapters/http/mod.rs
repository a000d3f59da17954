//! HTTP adapters - REST API implementations.

pub mod referee;

// Re-export key types for convenience
pub use referee::{referee_router, RefereeAppState};
