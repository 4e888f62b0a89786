//! Core modules for the gateway.
//!
//! This module contains the fundamental building blocks:
//! - Configuration and policy parameters
//! - Host call context

pub mod config;
pub mod context;

pub use config::*;
pub use context::*;
