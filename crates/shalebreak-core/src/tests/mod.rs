//! Test module for the turn-resolution loop.
//!
//! - `integration.rs`: end-to-end tests of the admit → pop → broadcast →
//!   apply → re-evaluate feedback loop
//! - `properties.rs`: property tests for combat arithmetic, bus ordering
//!   and queue reset
//! - `helpers.rs`: fixture boards, session factories and bus recorders

mod helpers;

// Re-export for convenience
pub use helpers::*;
