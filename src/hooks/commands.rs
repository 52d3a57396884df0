//! Command surface consumed by the transport layer.
//!
//! Each command is a named operation with a payload; every reply carries
//! a success flag, and failures become structured error strings instead
//! of crossing the boundary as errors.

use crate::core::types::{Address, DataType, HookError, MemoryValue, ProcessInfo};
use serde::{Deserialize, Serialize};

/// Inbound command, tagged by operation name
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    ListProcesses,
    CreateMemoryHook {
        hook_id: String,
        process_name: String,
        base_address: Address,
        #[serde(default)]
        offsets: Vec<i64>,
        #[serde(default)]
        data_type: DataType,
    },
    ScanMemory {
        hook_id: String,
        value: serde_json::Value,
        #[serde(default)]
        data_type: DataType,
        #[serde(default)]
        max_results: Option<usize>,
    },
    ReadMemoryValue {
        hook_id: String,
    },
    StartMemoryMonitoring {
        hook_id: String,
        /// Poll interval in seconds; the configured default applies when
        /// absent
        #[serde(default)]
        interval: Option<f64>,
    },
    StopMemoryMonitoring {
        hook_id: String,
    },
    DetachMemoryHook {
        hook_id: String,
    },
}

/// Payload of a successful reply
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Processes { processes: Vec<ProcessInfo> },
    Hook { hook_id: String },
    Addresses { addresses: Vec<Address> },
    Value { value: MemoryValue },
}

/// Reply envelope with the success flag the transport expects
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl CommandResponse {
    /// A bare success with no payload
    pub fn ok() -> Self {
        CommandResponse {
            success: true,
            error: None,
            data: None,
        }
    }

    /// A success carrying a payload
    pub fn with(data: ResponseData) -> Self {
        CommandResponse {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    /// A failure reply with a human-readable reason
    pub fn failure(reason: impl ToString) -> Self {
        CommandResponse {
            success: false,
            error: Some(reason.to_string()),
            data: None,
        }
    }
}

impl From<HookError> for CommandResponse {
    fn from(err: HookError) -> Self {
        CommandResponse::failure(err)
    }
}

/// Outbound notification emitted once per detected value change
#[derive(Debug, Clone, Serialize)]
pub struct MemoryEvent {
    pub hook_id: String,
    pub value: MemoryValue,
}

/// Event name the transport publishes change notifications under
pub const MEMORY_VALUE_CHANGED: &str = "memory_value_changed";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_command_parsing() {
        let cmd: Command = serde_json::from_value(json!({
            "command": "create_memory_hook",
            "hook_id": "health",
            "process_name": "game.exe",
            "base_address": "0x7FF6A0000000",
            "offsets": [16, -8],
            "data_type": "float32"
        }))
        .unwrap();

        match cmd {
            Command::CreateMemoryHook {
                hook_id,
                process_name,
                base_address,
                offsets,
                data_type,
            } => {
                assert_eq!(hook_id, "health");
                assert_eq!(process_name, "game.exe");
                assert_eq!(base_address, Address::new(0x7FF6_A000_0000));
                assert_eq!(offsets, vec![16, -8]);
                assert_eq!(data_type, DataType::Float32);
            }
            other => panic!("parsed wrong command: {:?}", other),
        }
    }

    #[test]
    fn test_command_defaults() {
        let cmd: Command = serde_json::from_value(json!({
            "command": "create_memory_hook",
            "hook_id": "h",
            "process_name": "p.exe",
            "base_address": 4096
        }))
        .unwrap();

        match cmd {
            Command::CreateMemoryHook {
                offsets, data_type, ..
            } => {
                assert!(offsets.is_empty());
                assert_eq!(data_type, DataType::Int32);
            }
            other => panic!("parsed wrong command: {:?}", other),
        }
    }

    #[test]
    fn test_response_serialization() {
        let reply = CommandResponse::with(ResponseData::Addresses {
            addresses: vec![Address::new(100), Address::new(200)],
        });
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, json!({"success": true, "addresses": [100, 200]}));

        let reply = CommandResponse::failure("Hook not found: health");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            json,
            json!({"success": false, "error": "Hook not found: health"})
        );

        let reply = CommandResponse::ok();
        assert_eq!(serde_json::to_value(&reply).unwrap(), json!({"success": true}));
    }

    #[test]
    fn test_event_serialization() {
        let event = MemoryEvent {
            hook_id: "health".to_string(),
            value: MemoryValue::I32(99),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, json!({"hook_id": "health", "value": 99}));
    }
}
