//! # Credkit Service
//!
//! Composition root for the credential core: environment configuration,
//! tracing setup, and a bounded blocking executor that keeps Argon2 work off
//! the async runtime.

pub mod config;
pub mod error;
pub mod executor;
pub mod telemetry;

pub use error::{ServiceError, ServiceResult};
