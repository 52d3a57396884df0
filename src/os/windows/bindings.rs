//! Safe wrappers over the Win32 calls used by the Windows backend

use crate::core::types::{Address, HookError, HookResult};
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::memoryapi::{ReadProcessMemory, VirtualQueryEx};
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::shellapi::{IsUserAnAdmin, ShellExecuteW};
use winapi::um::sysinfoapi::{GetSystemInfo, SYSTEM_INFO};
use winapi::um::winnt::{HANDLE, MEMORY_BASIC_INFORMATION};

/// PROCESS_QUERY_INFORMATION | PROCESS_VM_READ | PROCESS_VM_WRITE |
/// PROCESS_VM_OPERATION — the rights a hook needs
pub const HOOK_ACCESS: u32 = 0x0400 | 0x0010 | 0x0020 | 0x0008;

/// Encode a Rust string as a null-terminated wide string
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> HookResult<HANDLE> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            Err(HookError::open_denied(
                pid,
                windows::core::Error::from_win32().to_string(),
            ))
        } else {
            Ok(handle)
        }
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle or null
pub unsafe fn close_handle(handle: HANDLE) {
    if !handle.is_null() {
        winapi::um::handleapi::CloseHandle(handle);
    }
}

/// Safe wrapper for ReadProcessMemory
///
/// # Safety
/// The handle must be a valid process handle with VM-read access
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: u64,
    buffer: &mut [u8],
) -> HookResult<usize> {
    let mut bytes_read = 0usize;

    let result = ReadProcessMemory(
        handle,
        address as *const _,
        buffer.as_mut_ptr() as *mut _,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        Err(HookError::read_failed(
            Address::new(address),
            "ReadProcessMemory failed",
        ))
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for VirtualQueryEx
///
/// # Safety
/// The handle must be a valid process handle with query access
pub unsafe fn virtual_query_ex(
    handle: HANDLE,
    address: u64,
) -> HookResult<MEMORY_BASIC_INFORMATION> {
    let mut mbi: MEMORY_BASIC_INFORMATION = mem::zeroed();

    let result = VirtualQueryEx(
        handle,
        address as *const _,
        &mut mbi,
        mem::size_of::<MEMORY_BASIC_INFORMATION>(),
    );

    if result == 0 {
        Err(HookError::Os(format!(
            "VirtualQueryEx failed for address 0x{:X}",
            address
        )))
    } else {
        Ok(mbi)
    }
}

/// Addressable range bounds of user-mode processes on this system
pub fn system_address_range() -> (Address, Address) {
    unsafe {
        let mut info: SYSTEM_INFO = mem::zeroed();
        GetSystemInfo(&mut info);
        (
            Address::new(info.lpMinimumApplicationAddress as u64),
            Address::new(info.lpMaximumApplicationAddress as u64),
        )
    }
}

/// Whether the current process runs with administrator rights
pub fn is_user_an_admin() -> bool {
    unsafe { IsUserAnAdmin() != 0 }
}

/// Launch `file` with the "runas" verb, requesting elevation.
///
/// ShellExecuteW reports success as a value greater than 32.
pub fn shell_execute_runas(file: &str, params: &str) -> HookResult<()> {
    const SW_SHOWNORMAL: i32 = 1;

    let verb = to_wide("runas");
    let file_w = to_wide(file);
    let params_w = to_wide(params);

    let result = unsafe {
        ShellExecuteW(
            std::ptr::null_mut(),
            verb.as_ptr(),
            file_w.as_ptr(),
            params_w.as_ptr(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    };

    if result as usize > 32 {
        Ok(())
    } else {
        Err(HookError::Elevation(format!(
            "ShellExecuteW returned {}",
            result as usize
        )))
    }
}
