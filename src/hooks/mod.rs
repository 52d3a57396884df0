//! Hook lifecycle: command surface, polling monitors, and the registry
//! that owns them.

pub mod commands;
pub mod monitor;
pub mod registry;

pub use commands::{Command, CommandResponse, MemoryEvent, ResponseData, MEMORY_VALUE_CHANGED};
pub use monitor::MonitorHandle;
pub use registry::HookService;
