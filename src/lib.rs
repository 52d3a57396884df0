//! memhook - foreign-process memory introspection engine
//!
//! Attaches to running processes, resolves multi-level pointer chains,
//! scans address spaces for typed values, and monitors resolved
//! addresses for changes, publishing a notification whenever a watched
//! value moves.
//!
//! The OS surface sits behind the [`os::SystemApi`] and
//! [`os::ProcessMemory`] traits; everything above them is
//! platform-agnostic and runs against the simulated backend in
//! [`os::mock`] for tests.

pub mod config;
pub mod core;
pub mod hooks;
pub mod memory;
pub mod os;
pub mod process;

pub use crate::config::EngineConfig;
pub use crate::core::types::{
    Address, DataType, HookError, HookResult, MemoryValue, ProcessInfo, RegionInfo, RegionState,
};
pub use crate::core::VERSION;
pub use crate::hooks::{Command, CommandResponse, HookService, MemoryEvent};
