//! Core module containing the fundamental types for memhook
//!
//! Provides the building blocks used throughout the engine: address
//! handling, the typed value codec, process directory entries, region
//! descriptors and error types.

pub mod types;

pub use types::{
    Address, DataType, HookError, HookResult, MemoryValue, ProcessInfo, RegionInfo, RegionState,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
