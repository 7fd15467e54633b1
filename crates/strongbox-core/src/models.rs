//! Domain models for Strongbox.
//!
//! These are the core types shared across all crates.

pub mod audit;
pub mod certificate;
pub mod secret;
