//! Storage backends for credential persistence
//!
//! This module provides two storage backends:
//! 1. In-memory (tests and embedders with their own durability)
//! 2. JSON file (single-node persistence)

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{CredentialStore, ListFilter};
