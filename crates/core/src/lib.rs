//! Domain types shared by every Promptcraft crate.
//!
//! Holds the prompt parameter model, platform catalogue, request builder,
//! history record type, and the error taxonomy for generation calls.

pub mod error;
pub mod generation;
pub mod params;
pub mod platform;
pub mod prompt;
pub mod record;
pub mod types;
