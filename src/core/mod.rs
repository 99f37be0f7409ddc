//! Core business logic abstractions

pub mod config;
pub mod log;
pub mod provider;
pub mod rate;

// Re-export main types for cleaner imports
pub use provider::RateProvider;
pub use rate::{ConversionRequest, RateResult};
