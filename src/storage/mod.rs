//! Storage module for persistent gateway state.
//!
//! ## Backends
//!
//! - **InMemoryStore**: Fast, ephemeral storage for testing
//! - **FileStore**: JSON file-based persistence
//!
//! Any type implementing [`StorageBackend`] can be injected into a
//! [`crate::bridge::Bridge`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use btc_gateway::storage::{FileStore, InMemoryStore};
//!
//! // For testing
//! let backend = InMemoryStore::new();
//!
//! // Persistent
//! let backend = FileStore::new("/var/lib/gateway")?;
//! ```

pub mod backend;
pub mod state;

pub use backend::*;
pub use state::*;
