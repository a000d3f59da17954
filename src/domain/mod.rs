//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors)
//! - `decision` - Categories, dynamic parameters, preferences and comparison results
//! - `extraction` - Best-effort JSON extraction from model text
//! - `session` - Preference state and the analysis session aggregate

pub mod decision;
pub mod extraction;
pub mod foundation;
pub mod session;
