//! Process directory entry

use serde::{Deserialize, Serialize};

/// A single entry from a process directory snapshot.
///
/// Produced fresh on every listing and never cached; the directory is a
/// point-in-time view of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Process identifier
    pub pid: u32,
    /// Executable name (e.g. "notepad.exe")
    pub name: String,
    /// Number of threads at snapshot time
    pub thread_count: u32,
    /// Parent process identifier
    pub parent_pid: u32,
}

impl ProcessInfo {
    pub fn new(pid: u32, name: impl Into<String>, thread_count: u32, parent_pid: u32) -> Self {
        ProcessInfo {
            pid,
            name: name.into(),
            thread_count,
            parent_pid,
        }
    }

    /// Case-insensitive executable name match
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matching() {
        let info = ProcessInfo::new(1234, "Notepad.exe", 4, 1);
        assert!(info.name_matches("notepad.exe"));
        assert!(info.name_matches("NOTEPAD.EXE"));
        assert!(!info.name_matches("notepad"));
    }

    #[test]
    fn test_serialization() {
        let info = ProcessInfo::new(4, "System", 120, 0);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["pid"], 4);
        assert_eq!(json["name"], "System");
        assert_eq!(json["thread_count"], 120);
        assert_eq!(json["parent_pid"], 0);
    }
}
