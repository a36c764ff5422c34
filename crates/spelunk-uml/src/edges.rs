//! Visible edge collection.

use std::collections::HashSet;

use spelunk_core::{EdgeKind, Module};

/// An arrow between two visible components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleEdge<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub kind: EdgeKind,
}

/// Collect the arrows to draw, in module/component/dependency order.
///
/// An edge is kept only if its target names a component of some module in
/// `modules`. Repeated `(from, to)` pairs keep their first occurrence.
pub fn visible_edges(modules: &[Module]) -> Vec<VisibleEdge<'_>> {
    let nodes: HashSet<&str> = modules
        .iter()
        .flat_map(|m| m.components.iter().map(|c| c.name.as_str()))
        .collect();

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();

    for component in modules.iter().flat_map(|m| m.components.iter()) {
        for dep in &component.dependencies {
            let to = dep.target.as_str();
            if !nodes.contains(to) {
                continue;
            }
            if seen.insert((component.name.as_str(), to)) {
                edges.push(VisibleEdge {
                    from: &component.name,
                    to,
                    kind: dep.kind,
                });
            }
        }
    }

    edges
}
