//! Debug privilege elevation for the current process token.
//!
//! SeDebugPrivilege widens the set of processes the directory snapshot
//! and OpenProcess can reach; failure to raise it is non-fatal.

use super::bindings::to_wide;
use crate::core::types::{HookError, HookResult};
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::handleapi::CloseHandle;
use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};
use winapi::um::securitybaseapi::AdjustTokenPrivileges;
use winapi::um::winbase::LookupPrivilegeValueW;
use winapi::um::winnt::{
    HANDLE, LUID, LUID_AND_ATTRIBUTES, SE_PRIVILEGE_ENABLED, TOKEN_ADJUST_PRIVILEGES,
    TOKEN_PRIVILEGES, TOKEN_QUERY,
};

const SE_DEBUG_NAME: &str = "SeDebugPrivilege";

/// Token handle guard for RAII cleanup
struct TokenGuard(HANDLE);

impl Drop for TokenGuard {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe {
                CloseHandle(self.0);
            }
        }
    }
}

/// Enable SeDebugPrivilege on the current process token
pub fn enable_debug_privilege() -> HookResult<()> {
    unsafe {
        let mut token: HANDLE = std::ptr::null_mut();

        if OpenProcessToken(
            GetCurrentProcess(),
            TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
            &mut token,
        ) == FALSE
        {
            return Err(HookError::Os(
                "Failed to open process token".to_string(),
            ));
        }

        let _guard = TokenGuard(token);

        let mut luid = LUID {
            LowPart: 0,
            HighPart: 0,
        };

        let name = to_wide(SE_DEBUG_NAME);
        if LookupPrivilegeValueW(std::ptr::null(), name.as_ptr(), &mut luid) == FALSE {
            return Err(HookError::Os(
                "Failed to look up SeDebugPrivilege".to_string(),
            ));
        }

        let mut privileges = TOKEN_PRIVILEGES {
            PrivilegeCount: 1,
            Privileges: [LUID_AND_ATTRIBUTES {
                Luid: luid,
                Attributes: SE_PRIVILEGE_ENABLED,
            }],
        };

        if AdjustTokenPrivileges(
            token,
            FALSE,
            &mut privileges,
            std::mem::size_of::<TOKEN_PRIVILEGES>() as DWORD,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        ) == FALSE
        {
            return Err(HookError::Os(
                "Failed to adjust token privileges".to_string(),
            ));
        }

        Ok(())
    }
}
