//! Utility modules for the gateway.
//!
//! This module contains shared utilities used across the gateway:
//! - Fixed-length byte types and account identifiers
//! - Validation helpers
//! - Constants

pub mod constants;
pub mod crypto;
pub mod validation;

pub use constants::*;
pub use crypto::*;
pub use validation::*;
