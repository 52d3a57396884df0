//! Windows backend for the OS capability interface.
//!
//! ToolHelp32 snapshots for the process directory, OpenProcess /
//! ReadProcessMemory / VirtualQueryEx for attached-process access, and
//! ShellExecuteW("runas") for elevation relaunch.

pub mod bindings;
pub mod privileges;

use super::{ProcessMemory, SystemApi};
use crate::core::types::{
    Address, HookError, HookResult, ProcessInfo, RegionInfo, RegionState,
};
use std::mem;
use tracing::{debug, info};
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32First, Process32Next, PROCESSENTRY32, TH32CS_SNAPPROCESS,
};
use winapi::um::winnt::{HANDLE, MEMORY_BASIC_INFORMATION};

const MEM_COMMIT: u32 = 0x1000;
const MEM_RESERVE: u32 = 0x2000;

/// Owned process handle, released exactly once on drop
struct OwnedHandle(HANDLE);

// Process handles are kernel objects; using them from another thread is
// fine as long as ownership is unique, which OwnedHandle guarantees.
unsafe impl Send for OwnedHandle {}
unsafe impl Sync for OwnedHandle {}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            bindings::close_handle(self.0);
        }
    }
}

/// The live Windows implementation of [`SystemApi`]
#[derive(Default)]
pub struct WindowsSystem;

impl WindowsSystem {
    pub fn new() -> Self {
        WindowsSystem
    }
}

impl SystemApi for WindowsSystem {
    fn is_elevated(&self) -> bool {
        bindings::is_user_an_admin()
    }

    fn elevate(&self) -> HookResult<()> {
        if self.is_elevated() {
            return Ok(());
        }

        let exe = std::env::current_exe()?;
        let params = std::env::args()
            .skip(1)
            .map(|arg| format!("\"{}\"", arg))
            .collect::<Vec<_>>()
            .join(" ");

        bindings::shell_execute_runas(&exe.to_string_lossy(), &params)?;

        // The elevated instance takes over with the same arguments.
        info!("elevation granted, handing over to the relaunched instance");
        std::process::exit(0);
    }

    fn enumerate_processes(&self) -> Vec<ProcessInfo> {
        if let Err(e) = privileges::enable_debug_privilege() {
            debug!("debug privilege unavailable: {e}");
        }

        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
            return Vec::new();
        }
        let snapshot = OwnedHandle(snapshot);

        let mut processes = Vec::new();
        unsafe {
            let mut entry: PROCESSENTRY32 = mem::zeroed();
            entry.dwSize = mem::size_of::<PROCESSENTRY32>() as u32;

            if Process32First(snapshot.0, &mut entry) == 0 {
                return processes;
            }

            loop {
                processes.push(ProcessInfo::new(
                    entry.th32ProcessID,
                    exe_name(&entry.szExeFile),
                    entry.cntThreads,
                    entry.th32ParentProcessID,
                ));

                if Process32Next(snapshot.0, &mut entry) == 0 {
                    break;
                }
            }
        }

        processes
    }

    fn open_process(&self, pid: u32) -> HookResult<Box<dyn ProcessMemory>> {
        let handle = bindings::open_process(pid, bindings::HOOK_ACCESS)?;
        let range = bindings::system_address_range();
        Ok(Box::new(WindowsProcess {
            pid,
            handle: OwnedHandle(handle),
            range,
        }))
    }
}

/// Convert the fixed-size ANSI executable name from a snapshot entry
fn exe_name(raw: &[i8]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// An attached Windows process
struct WindowsProcess {
    pid: u32,
    handle: OwnedHandle,
    range: (Address, Address),
}

impl ProcessMemory for WindowsProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn read(&self, address: Address, buf: &mut [u8]) -> HookResult<()> {
        let read =
            unsafe { bindings::read_process_memory(self.handle.0, address.as_u64(), buf)? };
        if read != buf.len() {
            return Err(HookError::read_failed(
                address,
                format!("short read: {} of {} bytes", read, buf.len()),
            ));
        }
        Ok(())
    }

    fn query_region(&self, address: Address) -> HookResult<RegionInfo> {
        let mbi = unsafe { bindings::virtual_query_ex(self.handle.0, address.as_u64())? };
        Ok(parse_region(&mbi))
    }

    fn address_range(&self) -> (Address, Address) {
        self.range
    }
}

fn parse_region(mbi: &MEMORY_BASIC_INFORMATION) -> RegionInfo {
    let state = match mbi.State {
        MEM_COMMIT => RegionState::Committed,
        MEM_RESERVE => RegionState::Reserved,
        _ => RegionState::Free,
    };

    RegionInfo {
        base_address: Address::new(mbi.BaseAddress as u64),
        size: mbi.RegionSize as u64,
        state,
        protection: mbi.Protect,
    }
}
