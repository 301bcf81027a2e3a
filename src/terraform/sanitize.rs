use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\s.]+").expect("valid regex"))
}

/// Derive a Terraform-safe block name from an entity's display name.
///
/// Every maximal run of whitespace or `.` collapses to a single `-`, and a
/// leading digit gets a `_` prefix. Idempotent: sanitizing an already
/// sanitized name returns it unchanged.
pub fn sanitize_name(name: &str) -> String {
    let replaced = separator_pattern().replace_all(name, "-");
    if replaced.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", replaced)
    } else {
        replaced.into_owned()
    }
}

/// Run-scoped lookup from entity id to sanitized Terraform identifier.
///
/// Built once per generation run by registering every entity before any
/// cross-referencing render happens, then passed by reference into the
/// renderers. Entities whose names sanitize to the same identifier are
/// disambiguated with a deterministic numeric suffix in registration order.
#[derive(Debug, Default)]
pub struct IdentifierMap {
    by_id: HashMap<String, String>,
    taken: HashSet<String>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity and return its (possibly suffixed) Terraform id
    pub fn register(&mut self, id: &str, name: &str) -> String {
        let base = sanitize_name(name);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }

        self.taken.insert(candidate.clone());
        self.by_id.insert(id.to_string(), candidate.clone());
        candidate
    }

    /// Look up the Terraform id registered for an entity id
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_separator_runs() {
        assert_eq!(sanitize_name("my.server 1"), "my-server-1");
        assert_eq!(sanitize_name("a .. b"), "a-b");
        assert_eq!(sanitize_name("plain-name"), "plain-name");
    }

    #[test]
    fn test_sanitize_prefixes_leading_digit() {
        assert_eq!(sanitize_name("123-test"), "_123-test");
        assert_eq!(sanitize_name("9 lives"), "_9-lives");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "my.server 1",
            "123-test",
            "HQ",
            "  spaced  out  ",
            "9.9.9.9",
            "",
            "_already-safe",
        ];
        for sample in samples {
            let once = sanitize_name(sample);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_sanitize_never_starts_with_digit() {
        for sample in ["1", "42 servers", "7.a", "0"] {
            let sanitized = sanitize_name(sample);
            assert!(
                !sanitized.starts_with(|c: char| c.is_ascii_digit()),
                "{:?} starts with a digit",
                sanitized
            );
        }
    }

    #[test]
    fn test_identifier_map_resolves_registered_ids() {
        let mut map = IdentifierMap::new();
        map.register("net1", "HQ");
        map.register("grp1", "All Staff");

        assert_eq!(map.resolve("net1"), Some("HQ"));
        assert_eq!(map.resolve("grp1"), Some("All-Staff"));
        assert_eq!(map.resolve("missing"), None);
    }

    #[test]
    fn test_identifier_map_disambiguates_collisions() {
        let mut map = IdentifierMap::new();
        let first = map.register("res1", "My Server");
        let second = map.register("res2", "My Server");
        let third = map.register("res3", "My.Server");

        assert_eq!(first, "My-Server");
        assert_eq!(second, "My-Server-2");
        assert_eq!(third, "My-Server-3");

        // Every entity keeps its own identifier
        assert_eq!(map.resolve("res1"), Some("My-Server"));
        assert_eq!(map.resolve("res2"), Some("My-Server-2"));
        assert_eq!(map.resolve("res3"), Some("My-Server-3"));
    }
}
