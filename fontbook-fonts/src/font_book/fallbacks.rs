//! Family-name fallback chain.
//!
//! Maps generic and commonly aliased family names to the next family to
//! try. Resolution walks the chain until a family the registry can serve
//! is found, giving up (so the caller can use the last-resort family) on a
//! dead end, a cycle or the hop limit.

use std::collections::{HashMap, HashSet};

/// Default bound on the number of hops taken by one resolution.
pub const DEFAULT_MAX_HOPS: usize = 16;

/// Built-in fallback chain as `(family, next family)` pairs.
///
/// The chains are ordered so that:
/// 1. Generic CSS-style names reach a platform family first (macOS, Windows)
/// 2. Platform families fall through to metric-compatible free fonts
/// 3. Every chain ends at a widely installed Noto or DejaVu family
pub const FALLBACK_CHAIN: &[(&str, &str)] = &[
    // Generic names
    ("system-ui", "sans-serif"),
    ("ui-sans-serif", "sans-serif"),
    ("ui-serif", "serif"),
    ("ui-monospace", "monospace"),
    ("ui-rounded", "sans-serif"),
    ("sans-serif", "Helvetica Neue"),
    ("serif", "Times New Roman"),
    ("monospace", "Menlo"),
    ("cursive", "Apple Chancery"),
    ("fantasy", "Papyrus"),
    ("emoji", "Apple Color Emoji"),
    ("math", "STIX Two Math"),
    // Sans-serif
    ("San Francisco", "Helvetica Neue"),
    ("Segoe UI", "Helvetica Neue"),
    ("Helvetica Neue", "Helvetica"),
    ("Helvetica", "Arial"),
    ("Arial", "Liberation Sans"),
    ("Liberation Sans", "DejaVu Sans"),
    ("DejaVu Sans", "Noto Sans"),
    // Serif
    ("Times", "Times New Roman"),
    ("Times New Roman", "Liberation Serif"),
    ("Georgia", "Liberation Serif"),
    ("Liberation Serif", "DejaVu Serif"),
    ("DejaVu Serif", "Noto Serif"),
    // Monospace
    ("Menlo", "Consolas"),
    ("Monaco", "Menlo"),
    ("SF Mono", "Menlo"),
    ("Consolas", "DejaVu Sans Mono"),
    ("Courier", "Courier New"),
    ("Courier New", "Liberation Mono"),
    ("Liberation Mono", "DejaVu Sans Mono"),
    ("DejaVu Sans Mono", "Noto Sans Mono"),
    // Decorative
    ("Apple Chancery", "Comic Sans MS"),
    ("Comic Sans MS", "sans-serif"),
    ("Papyrus", "Impact"),
    ("Impact", "sans-serif"),
    // Emoji and symbols
    ("Apple Color Emoji", "Segoe UI Emoji"),
    ("Segoe UI Emoji", "Noto Color Emoji"),
    ("STIX Two Math", "Cambria Math"),
    ("Cambria Math", "serif"),
];

/// Why a fallback resolution stopped without finding a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEnd {
    /// The last name has no next entry.
    DeadEnd,
    /// A name was reached twice.
    Cycle,
    /// The hop limit was reached.
    HopLimit,
}

/// Outcome of walking the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackResolution<T> {
    Found { name: String, value: T, hops: usize },
    Exhausted(ChainEnd),
}

/// Directed name -> next-name mapping with bounded, cycle-safe resolution.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    next: HashMap<String, String>,
    max_hops: usize,
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::empty(DEFAULT_MAX_HOPS).with_entries(
            FALLBACK_CHAIN
                .iter()
                .map(|&(from, to)| (from.to_string(), to.to_string())),
        )
    }
}

impl FallbackChain {
    /// A chain with no entries.
    pub fn empty(max_hops: usize) -> Self {
        Self {
            next: HashMap::new(),
            max_hops: max_hops.max(1),
        }
    }

    /// Add or replace entries (later entries win).
    #[must_use]
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = (String, String)>) -> Self {
        for (from, to) in entries {
            self.insert(from, to);
        }
        self
    }

    #[must_use]
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops.max(1);
        self
    }

    /// Set the next family for `from`, returning the previous one.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) -> Option<String> {
        self.next.insert(from.into(), to.into())
    }

    pub fn next(&self, name: &str) -> Option<&str> {
        self.next.get(name).map(String::as_str)
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Follow the chain from `name` (exclusive) until `lookup` accepts a name.
    pub fn resolve<T>(
        &self,
        name: &str,
        mut lookup: impl FnMut(&str) -> Option<T>,
    ) -> FallbackResolution<T> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(name);
        let mut current = name;

        for hops in 1..=self.max_hops {
            let Some(next) = self.next(current) else {
                return FallbackResolution::Exhausted(ChainEnd::DeadEnd);
            };
            if !visited.insert(next) {
                return FallbackResolution::Exhausted(ChainEnd::Cycle);
            }
            if let Some(value) = lookup(next) {
                return FallbackResolution::Found {
                    name: next.to_string(),
                    value,
                    hops,
                };
            }
            current = next;
        }

        FallbackResolution::Exhausted(ChainEnd::HopLimit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_chain_has_no_self_loops() {
        assert!(!FALLBACK_CHAIN.is_empty());
        for (from, to) in FALLBACK_CHAIN {
            assert_ne!(from, to, "{from} must not point at itself");
        }
    }

    #[test]
    fn test_builtin_chain_terminates_for_every_name() {
        let chain = FallbackChain::default();
        for (from, _) in FALLBACK_CHAIN {
            let outcome = chain.resolve(from, |_| None::<()>);
            assert_eq!(
                outcome,
                FallbackResolution::Exhausted(ChainEnd::DeadEnd),
                "chain from {from} should end at a leaf family"
            );
        }
    }

    #[test]
    fn test_resolves_generic_name_to_available_family() {
        let chain = FallbackChain::default();
        let outcome = chain.resolve("sans-serif", |name| (name == "Arial").then_some(7));
        assert_eq!(
            outcome,
            FallbackResolution::Found {
                name: "Arial".to_string(),
                value: 7,
                hops: 3
            }
        );
    }

    #[test]
    fn test_cycle_detected() {
        let chain = FallbackChain::empty(32).with_entries([
            ("A".to_string(), "B".to_string()),
            ("B".to_string(), "C".to_string()),
            ("C".to_string(), "A".to_string()),
        ]);
        assert_eq!(
            chain.resolve("A", |_| None::<()>),
            FallbackResolution::Exhausted(ChainEnd::Cycle)
        );
    }

    #[test]
    fn test_hop_limit() {
        let entries = (0..10).map(|i| (format!("f{i}"), format!("f{}", i + 1)));
        let chain = FallbackChain::empty(3).with_entries(entries);
        assert_eq!(
            chain.resolve("f0", |name| (name == "f5").then_some(())),
            FallbackResolution::Exhausted(ChainEnd::HopLimit)
        );
    }

    #[test]
    fn test_unknown_name_is_dead_end() {
        let chain = FallbackChain::default();
        assert_eq!(
            chain.resolve("No Such Family", |_| Some(())),
            FallbackResolution::Exhausted(ChainEnd::DeadEnd)
        );
    }
}
