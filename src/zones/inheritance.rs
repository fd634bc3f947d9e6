//! Inheritance chain resolution
//!
//! Expands a zone into the ordered list of zones whose content composes it,
//! most specific first. Expansion is depth-first in `inherits` order; a name
//! already in the chain is skipped, which also makes cycles terminate. Names
//! missing from the registry are kept as bare entries and not expanded.

use crate::zones::registry::ZoneRegistry;
use std::collections::HashSet;
use tracing::trace;

/// Resolve the inheritance chain of `zone`
pub fn resolve_chain(zone: &str, registry: &ZoneRegistry) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![zone];

    while let Some(name) = stack.pop() {
        if !seen.insert(name) {
            trace!(zone = name, "Skipping zone already in chain");
            continue;
        }
        chain.push(name.to_string());

        match registry.get(name) {
            // Reverse so the first parent is expanded first
            Some(definition) => stack.extend(definition.inherits.iter().rev().map(String::as_str)),
            None => trace!(zone = name, "Zone not in registry, not expanding"),
        }
    }

    chain
}
