//! Pointer-chain address resolution.
//!
//! Chains are re-resolved on every read: intermediate pointers can
//! relocate between polls (module reloads, allocator churn in the
//! target), so a cached final address would go stale.

use crate::core::types::{Address, DataType, HookResult, MemoryValue};
use crate::os::ProcessMemory;

/// Pointer width of the target processes (64-bit)
pub const POINTER_WIDTH: usize = 8;

/// Compute the final address of a pointer chain.
///
/// For each offset in order: dereference one pointer-sized little-endian
/// read at the current address, then add the offset. An empty chain
/// returns `base` unchanged. Any failed intermediate read aborts the
/// whole resolution; partial results are never returned.
pub fn resolve(
    memory: &dyn ProcessMemory,
    base: Address,
    offsets: &[i64],
) -> HookResult<Address> {
    let mut address = base;

    for &offset in offsets {
        let mut buf = [0u8; POINTER_WIDTH];
        memory.read(address, &mut buf)?;
        address = Address::new(u64::from_le_bytes(buf)).offset(offset);
    }

    Ok(address)
}

/// Resolve a chain and read the typed value at its end
pub fn read_value(
    memory: &dyn ProcessMemory,
    base: Address,
    offsets: &[i64],
    data_type: DataType,
) -> HookResult<MemoryValue> {
    let address = resolve(memory, base, offsets)?;
    let mut buf = vec![0u8; data_type.size()];
    memory.read(address, &mut buf)?;
    Ok(data_type.decode(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{HookError, ProcessInfo};
    use crate::os::mock::{MockSpace, MockSystem};
    use crate::os::SystemApi;

    fn memory_over(space_setup: impl FnOnce(&MockSpace)) -> Box<dyn ProcessMemory> {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(1, "t.exe", 1, 1));
        space_setup(&space);
        system.open_process(1).unwrap()
    }

    #[test]
    fn test_empty_offsets_returns_base() {
        // No reads happen, so even an unmapped base resolves to itself
        let memory = memory_over(|_| {});
        let base = Address::new(0xDEAD_0000);
        assert_eq!(resolve(memory.as_ref(), base, &[]).unwrap(), base);
    }

    #[test]
    fn test_single_level_chain() {
        let memory = memory_over(|space| {
            let mut block = vec![0u8; 0x100];
            block[..8].copy_from_slice(&0x2000u64.to_le_bytes());
            space.map(0x1000, block);
        });

        let resolved = resolve(memory.as_ref(), Address::new(0x1000), &[0x10]).unwrap();
        assert_eq!(resolved, Address::new(0x2010));
    }

    #[test]
    fn test_multi_level_chain_with_negative_offset() {
        let memory = memory_over(|space| {
            let mut block = vec![0u8; 0x1000];
            // [0x1000] -> 0x1100, then +0x20 -> 0x1120
            block[..8].copy_from_slice(&0x1100u64.to_le_bytes());
            // [0x1120] -> 0x1400, then -0x80 -> 0x1380
            block[0x120..0x128].copy_from_slice(&0x1400u64.to_le_bytes());
            space.map(0x1000, block);
        });

        let resolved =
            resolve(memory.as_ref(), Address::new(0x1000), &[0x20, -0x80]).unwrap();
        assert_eq!(resolved, Address::new(0x1380));
    }

    #[test]
    fn test_broken_chain_fails() {
        let memory = memory_over(|space| {
            let mut block = vec![0u8; 0x10];
            // Pointer leads into unmapped space
            block[..8].copy_from_slice(&0xBAD0_0000u64.to_le_bytes());
            space.map(0x1000, block);
        });

        let err = resolve(memory.as_ref(), Address::new(0x1000), &[0, 8]).unwrap_err();
        assert!(matches!(err, HookError::ReadFailed { .. }));
    }

    #[test]
    fn test_read_value_decodes() {
        let memory = memory_over(|space| {
            let mut block = vec![0u8; 0x20];
            block[..8].copy_from_slice(&0x1010u64.to_le_bytes());
            block[0x10..0x14].copy_from_slice(&(-1234i32).to_le_bytes());
            space.map(0x1000, block);
        });

        let value =
            read_value(memory.as_ref(), Address::new(0x1000), &[0], DataType::Int32).unwrap();
        assert_eq!(value, MemoryValue::I32(-1234));
    }
}
