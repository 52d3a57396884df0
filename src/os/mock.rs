//! Simulated foreign address space for tests and benchmarks.
//!
//! Implements the [`SystemApi`]/[`ProcessMemory`] capability traits over
//! an in-memory region table, so resolver, scanner and monitor logic can
//! be exercised without touching a live process.

use super::{ProcessMemory, SystemApi};
use crate::core::types::{
    Address, HookError, HookResult, ProcessInfo, RegionInfo, RegionState, PAGE_READWRITE,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

struct MockRegion {
    base: u64,
    data: Vec<u8>,
    state: RegionState,
    protection: u32,
}

impl MockRegion {
    fn end(&self) -> u64 {
        self.base + self.data.len() as u64
    }

    fn info(&self) -> RegionInfo {
        RegionInfo {
            base_address: Address::new(self.base),
            size: self.data.len() as u64,
            state: self.state,
            protection: self.protection,
        }
    }
}

/// A simulated address space, shared between the opened handle and the
/// test that mutates it.
#[derive(Default)]
pub struct MockSpace {
    regions: Mutex<Vec<MockRegion>>,
}

impl MockSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a committed, read-write region at `base`
    pub fn map(&self, base: u64, data: Vec<u8>) {
        self.map_with(base, data, RegionState::Committed, PAGE_READWRITE);
    }

    /// Map a region with explicit state and protection
    pub fn map_with(&self, base: u64, data: Vec<u8>, state: RegionState, protection: u32) {
        let mut regions = self.regions.lock().unwrap();
        regions.push(MockRegion {
            base,
            data,
            state,
            protection,
        });
        regions.sort_by_key(|r| r.base);
    }

    /// Overwrite bytes at `address`. Panics if the range is unmapped;
    /// this is a test helper, not an engine path.
    pub fn write(&self, address: u64, bytes: &[u8]) {
        let mut regions = self.regions.lock().unwrap();
        let region = regions
            .iter_mut()
            .find(|r| address >= r.base && address + bytes.len() as u64 <= r.end())
            .expect("write outside any mapped region");
        let start = (address - region.base) as usize;
        region.data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    fn read(&self, address: Address, buf: &mut [u8]) -> HookResult<()> {
        let addr = address.as_u64();
        let end = addr
            .checked_add(buf.len() as u64)
            .ok_or_else(|| HookError::read_failed(address, "address overflow"))?;
        let regions = self.regions.lock().unwrap();
        let region = regions
            .iter()
            .find(|r| addr >= r.base && end <= r.end())
            .ok_or_else(|| HookError::read_failed(address, "address not mapped"))?;
        if !region.info().is_scannable() {
            return Err(HookError::read_failed(address, "region not readable"));
        }
        let start = (addr - region.base) as usize;
        buf.copy_from_slice(&region.data[start..start + buf.len()]);
        Ok(())
    }

    fn query_region(&self, address: Address) -> HookResult<RegionInfo> {
        let addr = address.as_u64();
        let regions = self.regions.lock().unwrap();
        if let Some(region) = regions.iter().find(|r| addr >= r.base && addr < r.end()) {
            return Ok(region.info());
        }
        // Synthesize a free gap up to the next mapped region, the way a
        // real region query reports unallocated space.
        let space_end = regions.iter().map(|r| r.end()).max().unwrap_or(0);
        let next_base = regions
            .iter()
            .map(|r| r.base)
            .filter(|&b| b > addr)
            .min()
            .unwrap_or(space_end);
        if next_base <= addr {
            return Err(HookError::read_failed(address, "beyond address space"));
        }
        Ok(RegionInfo {
            base_address: address,
            size: next_base - addr,
            state: RegionState::Free,
            protection: 0,
        })
    }

    fn range(&self) -> (Address, Address) {
        let regions = self.regions.lock().unwrap();
        let min = regions.iter().map(|r| r.base).min().unwrap_or(0);
        let max = regions.iter().map(|r| r.end()).max().unwrap_or(0);
        (Address::new(min), Address::new(max))
    }
}

struct MockProcess {
    pid: u32,
    space: Arc<MockSpace>,
}

impl ProcessMemory for MockProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn read(&self, address: Address, buf: &mut [u8]) -> HookResult<()> {
        self.space.read(address, buf)
    }

    fn query_region(&self, address: Address) -> HookResult<RegionInfo> {
        self.space.query_region(address)
    }

    fn address_range(&self) -> (Address, Address) {
        self.space.range()
    }
}

/// A simulated system with a process table and per-process address spaces.
#[derive(Default)]
pub struct MockSystem {
    elevated: Mutex<bool>,
    processes: Mutex<Vec<ProcessInfo>>,
    spaces: Mutex<HashMap<u32, Arc<MockSpace>>>,
    denied: Mutex<HashSet<u32>>,
}

impl MockSystem {
    pub fn new() -> Self {
        MockSystem {
            elevated: Mutex::new(true),
            ..Default::default()
        }
    }

    /// Register a process and return its (shared) address space
    pub fn add_process(&self, info: ProcessInfo) -> Arc<MockSpace> {
        let pid = info.pid;
        self.processes.lock().unwrap().push(info);
        let space = Arc::new(MockSpace::new());
        self.spaces.lock().unwrap().insert(pid, Arc::clone(&space));
        space
    }

    /// Look up the address space registered for `pid`
    pub fn space_of(&self, pid: u32) -> Option<Arc<MockSpace>> {
        self.spaces.lock().unwrap().get(&pid).cloned()
    }

    /// Make `open_process` fail for this pid with an access-denied error
    pub fn deny_open(&self, pid: u32) {
        self.denied.lock().unwrap().insert(pid);
    }

    pub fn set_elevated(&self, elevated: bool) {
        *self.elevated.lock().unwrap() = elevated;
    }
}

impl SystemApi for MockSystem {
    fn is_elevated(&self) -> bool {
        *self.elevated.lock().unwrap()
    }

    fn elevate(&self) -> HookResult<()> {
        self.set_elevated(true);
        Ok(())
    }

    fn enumerate_processes(&self) -> Vec<ProcessInfo> {
        self.processes.lock().unwrap().clone()
    }

    fn open_process(&self, pid: u32) -> HookResult<Box<dyn ProcessMemory>> {
        if self.denied.lock().unwrap().contains(&pid) {
            return Err(HookError::open_denied(pid, "open denied by mock"));
        }
        let space = self
            .spaces
            .lock()
            .unwrap()
            .get(&pid)
            .cloned()
            .ok_or_else(|| HookError::open_denied(pid, "no such process"))?;
        Ok(Box::new(MockProcess { pid, space }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PAGE_NOACCESS;

    #[test]
    fn test_read_within_region() {
        let space = MockSpace::new();
        space.map(0x1000, vec![0xAA; 16]);

        let mut buf = [0u8; 4];
        space.read(Address::new(0x1008), &mut buf).unwrap();
        assert_eq!(buf, [0xAA; 4]);
    }

    #[test]
    fn test_read_unmapped_fails() {
        let space = MockSpace::new();
        space.map(0x1000, vec![0; 16]);

        let mut buf = [0u8; 4];
        let err = space.read(Address::new(0x2000), &mut buf).unwrap_err();
        assert!(matches!(err, HookError::ReadFailed { .. }));

        // Straddling the end of a region is also a failed read
        let err = space.read(Address::new(0x100E), &mut buf).unwrap_err();
        assert!(matches!(err, HookError::ReadFailed { .. }));
    }

    #[test]
    fn test_read_noaccess_fails() {
        let space = MockSpace::new();
        space.map_with(0x1000, vec![0; 16], RegionState::Committed, PAGE_NOACCESS);

        let mut buf = [0u8; 4];
        assert!(space.read(Address::new(0x1000), &mut buf).is_err());
    }

    #[test]
    fn test_query_region_gap() {
        let space = MockSpace::new();
        space.map(0x1000, vec![0; 0x1000]);
        space.map(0x4000, vec![0; 0x1000]);

        let gap = space.query_region(Address::new(0x2000)).unwrap();
        assert_eq!(gap.state, RegionState::Free);
        assert_eq!(gap.base_address, Address::new(0x2000));
        assert_eq!(gap.size, 0x2000);

        let mapped = space.query_region(Address::new(0x4800)).unwrap();
        assert_eq!(mapped.base_address, Address::new(0x4000));
        assert_eq!(mapped.state, RegionState::Committed);
    }

    #[test]
    fn test_write_visible_through_handle() {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(100, "target.exe", 1, 1));
        space.map(0x1000, vec![0; 8]);

        let memory = system.open_process(100).unwrap();
        space.write(0x1000, &7i32.to_le_bytes());

        let mut buf = [0u8; 4];
        memory.read(Address::new(0x1000), &mut buf).unwrap();
        assert_eq!(i32::from_le_bytes(buf), 7);
    }

    #[test]
    fn test_denied_open() {
        let system = MockSystem::new();
        system.add_process(ProcessInfo::new(200, "protected.exe", 1, 1));
        system.deny_open(200);

        let err = system.open_process(200).unwrap_err();
        assert!(matches!(err, HookError::OpenDenied { pid: 200, .. }));
    }
}
