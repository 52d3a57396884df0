//! Fundamental types shared across the engine

pub mod address;
pub mod error;
pub mod process_info;
pub mod region;
pub mod value;

pub use address::Address;
pub use error::{HookError, HookResult};
pub use process_info::ProcessInfo;
pub use region::{RegionInfo, RegionState, PAGE_GUARD, PAGE_NOACCESS, PAGE_READWRITE};
pub use value::{DataType, MemoryValue, DEFAULT_WIDTH};
