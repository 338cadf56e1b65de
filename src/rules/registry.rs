//! Rule discovery: name → constructor.
//!
//! The registry is populated once by explicit registration calls in
//! [`Registry::builtin`] and read-only afterwards. The set of known rules is
//! exactly the set of registration calls executed — no naming-convention
//! introspection — so registration completeness is testable independent of
//! module layout. It holds no per-run state: `RepoContext` and `Settings`
//! are supplied by the caller at instantiation time.

use super::{directory, file, toplevel, LogConfig, Rule};
use crate::config::Settings;
use crate::context::RepoContext;
use std::collections::BTreeMap;

/// Constructs a rule bound to one run's context and configuration.
pub type RuleCtor = for<'a> fn(&'a RepoContext, &'a Settings, LogConfig) -> Box<dyn Rule + 'a>;

#[derive(Default)]
pub struct Registry {
    rules: BTreeMap<&'static str, RuleCtor>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            rules: BTreeMap::new(),
        }
    }

    /// Register a rule constructor under its stable name.
    ///
    /// Panics on a duplicate name: that is a programming error in the rule
    /// set, detected at load time before any repository path is read.
    pub fn register(&mut self, name: &'static str, ctor: RuleCtor) {
        if self.rules.insert(name, ctor).is_some() {
            panic!("duplicate rule registration: {name}");
        }
    }

    pub fn get(&self, name: &str) -> Option<RuleCtor> {
        self.rules.get(name).copied()
    }

    /// All registered names, in deterministic (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, RuleCtor)> + '_ {
        self.rules.iter().map(|(name, ctor)| (*name, *ctor))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The full built-in rule set.
    pub fn builtin() -> Registry {
        let mut registry = Registry::new();
        file::register(&mut registry);
        directory::register(&mut registry);
        toplevel::register(&mut registry);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy<'a>(
        repo: &'a RepoContext,
        settings: &'a Settings,
        log: LogConfig,
    ) -> Box<dyn Rule + 'a> {
        let _ = (repo, settings, log);
        unreachable!("never instantiated in registry tests");
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry.register("x.alpha", dummy);
        registry.register("x.beta", dummy);
        assert!(registry.get("x.alpha").is_some());
        assert!(registry.get("x.gamma").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    #[should_panic(expected = "duplicate rule registration: file.copyright")]
    fn test_duplicate_registration_is_fatal() {
        let mut registry = Registry::new();
        registry.register("file.copyright", dummy);
        registry.register("file.copyright", dummy);
    }

    #[test]
    fn test_names_are_sorted_and_stable() {
        let mut registry = Registry::new();
        registry.register("z.last", dummy);
        registry.register("a.first", dummy);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["a.first", "z.last"]);
    }

    #[test]
    fn test_builtin_set_is_complete() {
        let registry = Registry::builtin();
        for name in [
            "file.copyright",
            "file.license-id",
            "directory.sources",
            "directory.tests",
            "directory.examples",
            "directory.docs",
            "directory.papers",
            "toplevel.cmake",
            "toplevel.license",
            "toplevel.readme",
        ] {
            assert!(registry.get(name).is_some(), "missing builtin rule {name}");
        }
        assert_eq!(registry.len(), 10);
    }
}
