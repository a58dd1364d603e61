//! Detection of clipboard history tools
//!
//! A clipboard manager running on the host would keep a copy of every
//! secret the vault stages. The scan only classifies names handed to it;
//! enumerating processes is the caller's job.

use std::collections::BTreeSet;

/// Substrings of process names known to belong to clipboard history tools
pub const DEFAULT_SUSPECT_APPLICATIONS: &[&str] = &[
    "ditto",
    "clipx",
    "clcl",
    "arsclip",
    "clipmate",
    "copyq",
    "clipit",
    "parcellite",
    "diodon",
    "klipper",
    "greenclip",
    "cliphist",
    "Maccy",
];

/// Classifies process names against a set of known-bad substrings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatScanner {
    known_bad: BTreeSet<String>,
}

impl ThreatScanner {
    /// Create a scanner for the given tokens; empty tokens are ignored
    pub fn new<I, S>(known_bad: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let known_bad = known_bad
            .into_iter()
            .map(Into::into)
            .filter(|token: &String| !token.is_empty())
            .collect();
        Self { known_bad }
    }

    /// Tokens this scanner looks for
    pub fn known_bad(&self) -> &BTreeSet<String> {
        &self.known_bad
    }

    /// Names (in input order) containing any known-bad token, case-sensitively
    pub fn scan<S: AsRef<str>>(&self, process_names: &[S]) -> Vec<String> {
        process_names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.known_bad.iter().any(|token| name.contains(token.as_str())))
            .map(str::to_string)
            .collect()
    }
}

impl Default for ThreatScanner {
    fn default() -> Self {
        Self::new(DEFAULT_SUSPECT_APPLICATIONS.iter().copied())
    }
}

/// Return the subsequence of `process_names` matching any `known_bad` token
pub fn scan<S: AsRef<str>>(process_names: &[S], known_bad: &BTreeSet<String>) -> Vec<String> {
    ThreatScanner::new(known_bad.iter().cloned()).scan(process_names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scan_finds_substring_match() {
        let found = scan(&["explorer", "clipx64"], &tokens(&["clipx"]));
        assert_eq!(found, vec!["clipx64"]);
    }

    #[test]
    fn test_scan_nothing_suspicious() {
        let found = scan(&["bash"], &tokens(&["clipx"]));
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_is_case_sensitive() {
        let found = scan(&["ClipX", "CLIPX64"], &tokens(&["clipx"]));
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_keeps_input_order_and_duplicates() {
        let names = ["copyq", "bash", "ditto.exe", "copyq"];
        let found = ThreatScanner::default().scan(&names);
        assert_eq!(found, vec!["copyq", "ditto.exe", "copyq"]);
    }

    #[test]
    fn test_name_matching_several_tokens_reported_once() {
        let found = scan(&["clipx-ditto"], &tokens(&["clipx", "ditto"]));
        assert_eq!(found, vec!["clipx-ditto"]);
    }

    #[test]
    fn test_empty_token_ignored() {
        let scanner = ThreatScanner::new(["", "clcl"]);
        assert_eq!(scanner.known_bad().len(), 1);
        assert!(scanner.scan(&["bash"]).is_empty());
    }

    #[test]
    fn test_default_catalogue() {
        let scanner = ThreatScanner::default();
        for token in ["ditto", "clipx", "clcl", "arsclip", "clipmate"] {
            assert!(scanner.known_bad().contains(token));
        }
        assert!(scanner.scan(&["systemd", "sshd", "passman"]).is_empty());
    }
}
