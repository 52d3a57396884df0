//! Error types for memory hook operations

use super::address::Address;
use thiserror::Error;

/// Main error type for hook, scan and monitor operations
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Privilege elevation failed: {0}")]
    Elevation(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Access denied to process {pid}: {reason}")]
    OpenDenied { pid: u32, reason: String },

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: Address, reason: String },

    #[error("Hook not found: {0}")]
    HookNotFound(String),

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Value {value} is not representable as {data_type}")]
    InvalidValue { data_type: String, value: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("OS error: {0}")]
    Os(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),
}

/// Result type alias for hook operations
pub type HookResult<T> = Result<T, HookError>;

impl HookError {
    /// Creates a read failure for an address
    pub fn read_failed(address: Address, reason: impl Into<String>) -> Self {
        HookError::ReadFailed {
            address,
            reason: reason.into(),
        }
    }

    /// Creates an open-denied failure for a process
    pub fn open_denied(pid: u32, reason: impl Into<String>) -> Self {
        HookError::OpenDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates an invalid-value failure for an encode attempt
    pub fn invalid_value(data_type: impl Into<String>, value: impl ToString) -> Self {
        HookError::InvalidValue {
            data_type: data_type.into(),
            value: value.to_string(),
        }
    }

    /// Creates a Windows API error from the calling thread's last error code
    #[cfg(windows)]
    pub fn last_os_error() -> Self {
        HookError::WindowsApi(windows::core::Error::from_win32())
    }
}
