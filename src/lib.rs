//! Typed request and response models for a usage-based billing API.
//!
//! The HTTP layer lives elsewhere; this crate is the part that turns JSON into typed values and
//! back. See [`data`] for the models and [`error`] for what can go wrong while decoding them.

pub mod data;
pub mod error;

pub use crate::error::{AggregateInvalidDataError, InvalidDataError, InvalidDataKind, Result};
