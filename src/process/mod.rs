//! Process directory and attachment.
//!
//! Attachment matches by executable name against a fresh directory
//! snapshot, then opens the process with the rights a hook needs.

use crate::core::types::{HookError, HookResult, ProcessInfo};
use crate::os::{ProcessMemory, SystemApi};

/// Take a best-effort snapshot of all running processes.
///
/// Returns an empty list rather than failing when the snapshot cannot
/// be created.
pub fn list_processes(api: &dyn SystemApi) -> Vec<ProcessInfo> {
    api.enumerate_processes()
}

/// Attach to the first process whose executable name matches
/// (case-insensitive).
pub fn attach(api: &dyn SystemApi, process_name: &str) -> HookResult<Box<dyn ProcessMemory>> {
    let snapshot = api.enumerate_processes();
    let entry = snapshot
        .iter()
        .find(|p| p.name_matches(process_name))
        .ok_or_else(|| HookError::ProcessNotFound(process_name.to_string()))?;

    api.open_process(entry.pid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os::mock::MockSystem;

    fn system_with(name: &str, pid: u32) -> MockSystem {
        let system = MockSystem::new();
        system.add_process(ProcessInfo::new(pid, name, 2, 1));
        system
    }

    #[test]
    fn test_attach_case_insensitive() {
        let system = system_with("Target.exe", 42);
        let memory = attach(&system, "target.EXE").unwrap();
        assert_eq!(memory.pid(), 42);
    }

    #[test]
    fn test_attach_not_found() {
        let system = system_with("target.exe", 42);
        let err = attach(&system, "other.exe").unwrap_err();
        assert!(matches!(err, HookError::ProcessNotFound(name) if name == "other.exe"));
    }

    #[test]
    fn test_attach_open_denied() {
        let system = system_with("guarded.exe", 77);
        system.deny_open(77);
        let err = attach(&system, "guarded.exe").unwrap_err();
        assert!(matches!(err, HookError::OpenDenied { pid: 77, .. }));
    }

    #[test]
    fn test_list_is_fresh_snapshot() {
        let system = system_with("a.exe", 1);
        assert_eq!(list_processes(&system).len(), 1);
        system.add_process(ProcessInfo::new(2, "b.exe", 1, 1));
        assert_eq!(list_processes(&system).len(), 2);
    }
}
