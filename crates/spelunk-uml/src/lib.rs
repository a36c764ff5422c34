//! Diagram serialization for filtered dependency trees.
//!
//! Modules become grouped boxes, components become nodes inside them and
//! dependencies become arrows. Arrows to components that are not visible
//! are left out, and each arrow is written once.
//!
//! # Module Structure
//!
//! - [`edges`]: visible, deduplicated edge collection shared by both dialects
//! - [`plantuml`]: PlantUML output (the default)
//! - [`dot`]: Graphviz DOT output

pub mod dot;
pub mod edges;
pub mod plantuml;

use std::str::FromStr;

use strum_macros::{Display, IntoStaticStr};

use spelunk_core::Module;
use spelunk_error::Error;

pub use dot::{DotBuilder, render_dot};
pub use edges::{VisibleEdge, visible_edges};
pub use plantuml::{UmlBuilder, render_plantuml};

/// Diagram description language handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    PlantUml,
    Dot,
}

impl DiagramFormat {
    /// Default renderer invocation producing SVG on stdout.
    pub fn default_command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::PlantUml => ("plantuml", &["-pipe", "-tsvg"]),
            Self::Dot => ("dot", &["-Tsvg"]),
        }
    }
}

impl FromStr for DiagramFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plantuml" | "puml" | "uml" => Ok(Self::PlantUml),
            "dot" | "graphviz" => Ok(Self::Dot),
            other => Err(Error::unsupported(format!(
                "unknown diagram format '{other}', use 'plantuml' or 'dot'"
            ))),
        }
    }
}

/// Serialize modules in the requested dialect.
pub fn serialize(modules: &[Module], format: DiagramFormat) -> String {
    match format {
        DiagramFormat::PlantUml => render_plantuml(modules),
        DiagramFormat::Dot => render_dot(modules),
    }
}
