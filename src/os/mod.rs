//! Capability interface over the host OS.
//!
//! Everything privileged (handle tables, snapshot enumeration, region
//! queries) sits behind these two traits so the engine logic — resolver,
//! scanner, monitor — stays platform-agnostic and testable against a
//! simulated address space.

pub mod mock;
#[cfg(windows)]
pub mod windows;

use crate::core::types::{Address, HookResult, ProcessInfo, RegionInfo};

/// System-wide operations: privilege state and the process directory.
pub trait SystemApi: Send + Sync {
    /// Whether the current execution context is elevated
    fn is_elevated(&self) -> bool;

    /// Relaunch the current executable with an elevation request.
    ///
    /// No-op when already elevated. On a successful relaunch the current
    /// instance terminates; returns `HookError::Elevation` when the OS
    /// declines the request.
    fn elevate(&self) -> HookResult<()>;

    /// Best-effort snapshot of running processes.
    ///
    /// Attempts to raise the debug privilege first (non-fatal on failure)
    /// and returns an empty list when the snapshot itself cannot be
    /// created.
    fn enumerate_processes(&self) -> Vec<ProcessInfo>;

    /// Open a process for memory introspection.
    ///
    /// Requests query, VM-read, VM-write and VM-operation rights. The
    /// returned handle is released when the value is dropped; dropping
    /// twice is not possible and release is therefore always safe.
    fn open_process(&self, pid: u32) -> HookResult<Box<dyn ProcessMemory>>;
}

/// Memory access to a single attached process.
pub trait ProcessMemory: Send + Sync {
    /// Process identifier of the attached process
    fn pid(&self) -> u32;

    /// Read exactly `buf.len()` bytes at `address`.
    ///
    /// Short reads are reported as `HookError::ReadFailed`; partial data
    /// is never returned.
    fn read(&self, address: Address, buf: &mut [u8]) -> HookResult<()>;

    /// Query the region containing `address`
    fn query_region(&self, address: Address) -> HookResult<RegionInfo>;

    /// The addressable range bounds (min, max) of the process
    fn address_range(&self) -> (Address, Address);
}

impl std::fmt::Debug for dyn ProcessMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessMemory").field("pid", &self.pid()).finish()
    }
}

#[cfg(windows)]
pub use self::windows::WindowsSystem;
