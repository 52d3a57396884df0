//! Virtual memory region descriptors used by the scanner's region walk

use super::address::Address;

/// PAGE_NOACCESS protection value
pub const PAGE_NOACCESS: u32 = 0x01;
/// PAGE_READWRITE protection value
pub const PAGE_READWRITE: u32 = 0x04;
/// PAGE_GUARD protection modifier
pub const PAGE_GUARD: u32 = 0x100;

/// Allocation state of a virtual memory region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// Not allocated
    Free,
    /// Reserved but not backed by storage
    Reserved,
    /// Backed by physical storage or pagefile
    Committed,
}

/// A region returned by the OS region-query primitive.
///
/// Ephemeral: consumed immediately by the scanner walk, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    /// Base address of the region
    pub base_address: Address,
    /// Size of the region in bytes
    pub size: u64,
    /// Allocation state
    pub state: RegionState,
    /// Protection flags
    pub protection: u32,
}

impl RegionInfo {
    /// Check if the region can be read at all
    pub fn is_readable(&self) -> bool {
        self.protection != PAGE_NOACCESS && (self.protection & PAGE_GUARD) == 0
    }

    /// Check if the region is committed and readable, i.e. worth scanning
    pub fn is_scannable(&self) -> bool {
        self.state == RegionState::Committed && self.is_readable()
    }

    /// One past the last address of the region
    pub fn end_address(&self) -> Address {
        self.base_address.advance(self.size)
    }

    /// Check if an address falls within this region
    pub fn contains(&self, address: Address) -> bool {
        address >= self.base_address && address < self.end_address()
    }
}
