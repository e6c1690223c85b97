//! newshub/crates/nh-core/src/lib.rs
//!
//! Domain records, the persistence port and the in-process store behind
//! NewsHub.

pub mod access;
pub mod error;
pub mod memory;
pub mod models;
pub mod seed;
pub mod store;
pub mod traits;

// Re-exporting for easier access in other crates
pub use access::*;
pub use error::*;
pub use memory::MemoryRepository;
pub use models::*;
pub use store::{Counters, SharedStore, Store, DEFAULT_RECENT_LIMIT};
pub use traits::*;
