//! PlantUML output.
//!
//! Names are written verbatim. A name containing `"` or `]` produces markup
//! the renderer may reject; no escaping is attempted.

use std::fmt::Write;

use tracing::debug;

use spelunk_core::Module;

use crate::edges::visible_edges;

/// Write indentation to output.
fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// Builder for a PlantUML component diagram.
pub struct UmlBuilder {
    output: String,
    indent: usize,
}

impl Default for UmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UmlBuilder {
    pub fn new() -> Self {
        let mut output = String::with_capacity(4096);
        output.push_str("@startuml\n");
        Self { output, indent: 0 }
    }

    /// Start a package box.
    pub fn start_package(&mut self, name: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "package \"{name}\" {{");
        self.indent += 1;
        self
    }

    /// End the current package box.
    pub fn end_package(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        write_indent(&mut self.output, self.indent);
        self.output.push_str("}\n");
        self
    }

    /// Add a component node.
    pub fn component(&mut self, name: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "[{name}]");
        self
    }

    /// Add a dependency arrow.
    pub fn arrow(&mut self, from: &str, to: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}", arrow(from, to));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Finish building and return the markup.
    pub fn build(mut self) -> String {
        self.output.push_str("@enduml\n");
        self.output
    }
}

/// Literal arrow text for one dependency.
pub fn arrow(from: &str, to: &str) -> String {
    format!("[{from}] --> [{to}]")
}

/// Render filtered modules as a PlantUML component diagram.
pub fn render_plantuml(modules: &[Module]) -> String {
    let mut uml = UmlBuilder::new();

    for module in modules {
        uml.start_package(&module.name);
        for component in &module.components {
            uml.component(&component.name);
        }
        uml.end_package();
    }

    let edges = visible_edges(modules);
    if !edges.is_empty() {
        uml.blank();
    }
    for edge in &edges {
        uml.arrow(edge.from, edge.to);
    }

    debug!(modules = modules.len(), edges = edges.len(), "rendered plantuml");
    uml.build()
}
