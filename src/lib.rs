//! Schema-validated client for the MathShare exercise platform.
//!
//! This crate is the boundary between untyped HTTP/JSON input and typed
//! application code: every externally-sourced value (API response,
//! environment configuration) is parsed and bound-checked before it crosses
//! into the caller, and every failure is normalized into one error taxonomy.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::ApiError;
pub use services::conversion::{convert_handwriting, ConversionOutcome};
pub use services::exercises::ExerciseService;
pub use services::http::ApiClient;
