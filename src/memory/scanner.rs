//! Brute-force pattern scan over an attached process's address space.
//!
//! The walk queries region bounds once, then advances region by region,
//! scanning only committed, readable regions in fixed-size chunks. Each
//! chunk read is extended by `pattern.len() - 1` bytes so matches that
//! straddle a chunk boundary are still found; a match is attributed to
//! the chunk that starts it, which keeps results strictly ascending and
//! free of duplicates.

use crate::core::types::Address;
use crate::os::ProcessMemory;
use tracing::trace;

/// Chunk size used for region reads
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Scan the full address space for `pattern`, collecting at most
/// `max_results` match addresses in ascending order.
///
/// Chunks that cannot be read (permission boundaries, transient
/// failures) are skipped silently and the walk continues.
pub fn scan(
    memory: &dyn ProcessMemory,
    pattern: &[u8],
    max_results: usize,
    chunk_size: usize,
) -> Vec<Address> {
    let mut matches = Vec::new();
    if pattern.is_empty() || max_results == 0 || chunk_size == 0 {
        return matches;
    }

    let (min_address, max_address) = memory.address_range();
    let mut current = min_address;

    while current < max_address && matches.len() < max_results {
        let region = match memory.query_region(current) {
            Ok(region) => region,
            Err(_) => break,
        };
        if region.size == 0 {
            break;
        }

        if region.is_scannable() {
            scan_region(
                memory,
                region.base_address,
                region.size,
                pattern,
                max_results,
                chunk_size,
                &mut matches,
            );
        }

        current = region.base_address.advance(region.size);
    }

    matches
}

fn scan_region(
    memory: &dyn ProcessMemory,
    base: Address,
    size: u64,
    pattern: &[u8],
    max_results: usize,
    chunk_size: usize,
    matches: &mut Vec<Address>,
) {
    let tail = (pattern.len() - 1) as u64;
    let mut offset = 0u64;

    while offset < size && matches.len() < max_results {
        let chunk_base = base.advance(offset);
        let read_len = (chunk_size as u64 + tail).min(size - offset) as usize;

        let mut buffer = vec![0u8; read_len];
        if memory.read(chunk_base, &mut buffer).is_ok() {
            find_in_chunk(&buffer, pattern, chunk_base, chunk_size, max_results, matches);
        } else {
            trace!(address = %chunk_base, "skipping unreadable chunk");
        }

        offset += chunk_size as u64;
    }
}

fn find_in_chunk(
    buffer: &[u8],
    pattern: &[u8],
    chunk_base: Address,
    chunk_size: usize,
    max_results: usize,
    matches: &mut Vec<Address>,
) {
    if buffer.len() < pattern.len() {
        return;
    }

    // Positions at or past chunk_size belong to the next chunk's window.
    let window = (buffer.len() - pattern.len() + 1).min(chunk_size);

    for pos in 0..window {
        if &buffer[pos..pos + pattern.len()] == pattern {
            matches.push(chunk_base.advance(pos as u64));
            if matches.len() >= max_results {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ProcessInfo, RegionState, PAGE_NOACCESS, PAGE_READWRITE};
    use crate::os::mock::MockSystem;
    use crate::os::SystemApi;

    #[test]
    fn test_pattern_at_known_offset() {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(1, "t.exe", 1, 1));
        let mut block = vec![0u8; 4096];
        block[100..104].copy_from_slice(&42i32.to_le_bytes());
        space.map(0, block);

        let memory = system.open_process(1).unwrap();
        let results = scan(
            memory.as_ref(),
            &42i32.to_le_bytes(),
            100,
            DEFAULT_CHUNK_SIZE,
        );
        assert!(results.contains(&Address::new(100)));
    }

    #[test]
    fn test_cap_and_ordering() {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(1, "t.exe", 1, 1));
        let mut block = vec![0u8; 8192];
        for i in 0..20 {
            let at = i * 256;
            block[at..at + 4].copy_from_slice(&7u32.to_le_bytes());
        }
        space.map(0x10000, block);

        let memory = system.open_process(1).unwrap();
        let results = scan(memory.as_ref(), &7u32.to_le_bytes(), 5, DEFAULT_CHUNK_SIZE);

        assert_eq!(results.len(), 5);
        assert!(results.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_skips_uncommitted_and_guarded_regions() {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(1, "t.exe", 1, 1));
        let pattern = 99u32.to_le_bytes();

        let mut block = vec![0u8; 4096];
        block[..4].copy_from_slice(&pattern);
        space.map_with(
            0x1000,
            block.clone(),
            RegionState::Reserved,
            PAGE_READWRITE,
        );
        space.map_with(0x10000, block.clone(), RegionState::Committed, PAGE_NOACCESS);
        space.map(0x20000, block);

        let memory = system.open_process(1).unwrap();
        let results = scan(memory.as_ref(), &pattern, 100, DEFAULT_CHUNK_SIZE);
        assert_eq!(results, vec![Address::new(0x20000)]);
    }

    #[test]
    fn test_match_across_chunk_boundary() {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(1, "t.exe", 1, 1));
        let mut block = vec![0u8; 8192];
        // Straddles the 4096-byte chunk boundary
        block[4094..4098].copy_from_slice(&0xDDCC_BBAAu32.to_le_bytes());
        space.map(0, block);

        let memory = system.open_process(1).unwrap();
        let results = scan(
            memory.as_ref(),
            &0xDDCC_BBAAu32.to_le_bytes(),
            100,
            DEFAULT_CHUNK_SIZE,
        );
        assert_eq!(results, vec![Address::new(4094)]);
    }

    #[test]
    fn test_no_duplicate_in_overlap_window() {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(1, "t.exe", 1, 1));
        let mut block = vec![0u8; 8192];
        // Sits entirely inside the overlap tail read with the first chunk
        block[4096..4100].copy_from_slice(&0x0102_0304u32.to_le_bytes());
        space.map(0, block);

        let memory = system.open_process(1).unwrap();
        let results = scan(
            memory.as_ref(),
            &0x0102_0304u32.to_le_bytes(),
            100,
            DEFAULT_CHUNK_SIZE,
        );
        assert_eq!(results, vec![Address::new(4096)]);
    }

    #[test]
    fn test_empty_pattern_and_zero_cap() {
        let system = MockSystem::new();
        let space = system.add_process(ProcessInfo::new(1, "t.exe", 1, 1));
        space.map(0, vec![0u8; 64]);
        let memory = system.open_process(1).unwrap();

        assert!(scan(memory.as_ref(), &[], 100, DEFAULT_CHUNK_SIZE).is_empty());
        assert!(scan(memory.as_ref(), &[0], 0, DEFAULT_CHUNK_SIZE).is_empty());
    }
}
