//! Running process enumeration

use sysinfo::{ProcessesToUpdate, System};

/// Names of all processes visible to the current user, sorted and deduplicated
pub fn list_process_names() -> Vec<String> {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let mut names: Vec<String> = sys
        .processes()
        .values()
        .map(|p| p.name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(any(target_os = "linux", target_os = "macos", windows))]
    #[test]
    fn test_lists_running_processes() {
        let names = list_process_names();

        assert!(!names.is_empty());
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }
}
