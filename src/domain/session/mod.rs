//! Session domain module.
//!
//! A session is one dilemma from setup to reset. It holds the preference
//! state (working copy and committed baseline) and the latest comparison.

mod aggregate;
mod state;

pub use aggregate::{AnalysisSession, SessionPhase};
pub use state::PreferenceState;
