//! Graphviz DOT output.
//!
//! Unlike PlantUML, DOT needs identifiers, so every distinct component name
//! gets a stable `c<N>` id in first-seen order and the name goes into the
//! label. Edge style follows the edge kind.

use std::collections::HashMap;
use std::fmt::Write;

use tracing::debug;

use spelunk_core::{EdgeKind, Module};

use crate::edges::visible_edges;

/// Sanitize a string to be a valid DOT identifier.
/// Replaces any non-alphanumeric character with underscore.
pub fn sanitize_id(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Escape special characters for DOT labels.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Write indentation to output.
fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// Edge attributes for each edge kind.
fn edge_attrs(kind: EdgeKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        EdgeKind::Factory => &[("style", "dashed")],
        EdgeKind::Repository => &[("color", "#2a7ab0")],
        EdgeKind::Connection => &[("style", "bold")],
        EdgeKind::Import => &[],
    }
}

/// A DOT graph builder for constructing valid DOT output.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Create a new DOT graph with the given name.
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph {name} {{");
        Self { output, indent: 1 }
    }

    /// Add a graph attribute.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}=\"{}\";", key, escape_label(value));
        self
    }

    /// Add a node style default.
    pub fn node_style(&mut self, attrs: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "node [{attrs}];");
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Add a simple node with just an ID and label.
    pub fn node(&mut self, id: &str, label: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}[label=\"{}\"];", id, escape_label(label));
        self
    }

    /// Add an edge, with attributes when there are any.
    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        if attrs.is_empty() {
            let _ = writeln!(self.output, "{from} -> {to};");
            return self;
        }
        let _ = write!(self.output, "{from} -> {to} [");
        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            let _ = write!(self.output, "{key}=\"{value}\"");
        }
        self.output.push_str("];\n");
        self
    }

    /// Start a subgraph cluster.
    pub fn start_cluster(&mut self, id: &str, label: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "subgraph cluster_{} {{", sanitize_id(id));
        self.indent += 1;
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "label=\"{}\";", escape_label(label));
        self
    }

    /// End the current subgraph cluster.
    pub fn end_cluster(&mut self) -> &mut Self {
        self.indent -= 1;
        write_indent(&mut self.output, self.indent);
        self.output.push_str("}\n");
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

/// Render filtered modules as a clustered DOT graph.
pub fn render_dot(modules: &[Module]) -> String {
    let mut ids: HashMap<&str, String> = HashMap::new();
    let mut dot = DotBuilder::new("dependencies");
    dot.attr("rankdir", "LR");
    dot.node_style("shape=box, style=\"rounded,filled\", fillcolor=\"#f0f0f0\", fontname=\"Helvetica\"");
    dot.blank();

    for (index, module) in modules.iter().enumerate() {
        dot.start_cluster(&format!("{index}_{}", module.name), &module.name);
        for component in &module.components {
            // Same-named components are one node; the first module wins.
            if ids.contains_key(component.name.as_str()) {
                continue;
            }
            let id = format!("c{}", ids.len());
            dot.node(&id, &component.name);
            ids.insert(&component.name, id);
        }
        dot.end_cluster();
    }

    let edges = visible_edges(modules);
    if !edges.is_empty() {
        dot.blank();
    }
    for edge in &edges {
        if let (Some(from), Some(to)) = (ids.get(edge.from), ids.get(edge.to)) {
            dot.edge(from, to, edge_attrs(edge.kind));
        }
    }

    debug!(modules = modules.len(), edges = edges.len(), "rendered dot");
    dot.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spelunk_core::{Component, Edge};

    #[test]
    fn test_sanitize_and_escape() {
        assert_eq!(sanitize_id("Auth.Module-1"), "Auth_Module_1");
        assert_eq!(escape_label("say \"hi\""), "say \\\"hi\\\"");
    }

    #[test]
    fn test_clusters_and_styled_edges() {
        let modules = vec![
            Module::new("Data").with_component(Component::new("STORAGE")),
            Module::new("Domain").with_component(
                Component::new("Orders")
                    .with_dependency(Edge::new("STORAGE", EdgeKind::Repository))
                    .with_dependency(Edge::new("Clock", EdgeKind::Factory)),
            ),
        ];

        assert_eq!(
            render_dot(&modules),
            "digraph dependencies {\n\
             \x20 rankdir=\"LR\";\n\
             \x20 node [shape=box, style=\"rounded,filled\", fillcolor=\"#f0f0f0\", fontname=\"Helvetica\"];\n\
             \n\
             \x20 subgraph cluster_0_Data {\n\
             \x20   label=\"Data\";\n\
             \x20   c0[label=\"STORAGE\"];\n\
             \x20 }\n\
             \x20 subgraph cluster_1_Domain {\n\
             \x20   label=\"Domain\";\n\
             \x20   c1[label=\"Orders\"];\n\
             \x20 }\n\
             \n\
             \x20 c1 -> c0 [color=\"#2a7ab0\"];\n\
             }\n"
        );
    }
}
