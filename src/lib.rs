//! Referee - Decision Support Service
//!
//! Turns a free-text dilemma into a small set of tunable parameters, then asks
//! a hosted language model to compare concrete options against those
//! parameters and the user's priorities. Parameters can be edited and the
//! comparison refreshed until the user resets the session.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
