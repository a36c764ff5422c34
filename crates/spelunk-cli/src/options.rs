//! Command-line option groups.
//!
//! Each group is flattened into the top-level parser and converts itself
//! into the settings of the crate it configures.

use std::path::PathBuf;

use clap::Args;

use spelunk_collect::FilterOptions;
use spelunk_render::RendererConfig;
use spelunk_uml::DiagramFormat;

/// Where the HTTP surface listens.
#[derive(Args, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind.
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on; also written into the page's absolute URLs.
    #[arg(long, value_name = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Directory holding a `dep-select.hbs` page template.
    #[arg(long = "views-dir", value_name = "DIR")]
    pub views_dir: Option<PathBuf>,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            views_dir: None,
        }
    }
}

/// Which diagram dialect to emit and which program renders it.
#[derive(Args, Debug, Clone, Default)]
pub struct RendererOptions {
    /// Diagram dialect: 'plantuml' or 'dot'.
    #[arg(long = "renderer", value_name = "FORMAT", default_value = "plantuml")]
    pub format: DiagramFormat,

    /// Renderer executable, replacing the dialect's default program.
    ///
    /// Each image starts a fresh process. To skip the JVM startup of
    /// PlantUML, point this at a nailgun client talking to a warm server,
    /// e.g. `--renderer-cmd ng --renderer-args "net.sourceforge.plantuml.Run -pipe -tsvg"`.
    #[arg(long = "renderer-cmd", value_name = "PROGRAM")]
    pub program: Option<String>,

    /// Renderer arguments, whitespace separated, replacing the defaults.
    #[arg(long = "renderer-args", value_name = "ARGS", allow_hyphen_values = true)]
    pub args: Option<String>,
}

impl RendererOptions {
    pub fn renderer_config(&self) -> RendererConfig {
        let mut config = RendererConfig::for_format(self.format);
        if let Some(program) = &self.program {
            config.program = program.clone();
        }
        if let Some(args) = &self.args {
            config.args = args.split_whitespace().map(str::to_string).collect();
        }
        config
    }
}

/// Process-wide ignores added to the built-in ones.
#[derive(Args, Debug, Clone, Default)]
pub struct IgnoreOptions {
    /// Component name to hide everywhere (repeatable).
    #[arg(long = "ignore-component", value_name = "NAME", action = clap::ArgAction::Append)]
    pub components: Vec<String>,

    /// Module name to hide everywhere (repeatable).
    #[arg(long = "ignore-module", value_name = "NAME", action = clap::ArgAction::Append)]
    pub modules: Vec<String>,
}

impl IgnoreOptions {
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::new()
            .with_ignored_components(self.components.iter().cloned())
            .with_ignored_modules(self.modules.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeOptions,

        #[command(flatten)]
        renderer: RendererOptions,

        #[command(flatten)]
        ignore: IgnoreOptions,
    }

    #[test]
    fn test_parse_defaults() {
        let cli = TestCli::parse_from(["spelunk"]);
        assert_eq!(cli.serve.host, "0.0.0.0");
        assert_eq!(cli.serve.port, 3001);
        assert_eq!(cli.serve.views_dir, None);
        assert_eq!(cli.renderer.format, DiagramFormat::PlantUml);
        assert!(cli.ignore.components.is_empty());
    }

    #[test]
    fn test_parse_everything() {
        let cli = TestCli::parse_from([
            "spelunk",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--views-dir",
            "views",
            "--renderer",
            "dot",
            "--renderer-cmd",
            "/usr/local/bin/dot",
            "--renderer-args",
            "-Tsvg -Gdpi=72",
            "--ignore-module",
            "HealthModule",
            "--ignore-module",
            "MetricsModule",
            "--ignore-component",
            "Reflector",
        ]);

        assert_eq!(cli.serve.host, "127.0.0.1");
        assert_eq!(cli.serve.port, 8080);
        assert_eq!(cli.serve.views_dir, Some(PathBuf::from("views")));
        assert_eq!(
            cli.renderer.renderer_config(),
            RendererConfig::new("/usr/local/bin/dot", ["-Tsvg", "-Gdpi=72"])
        );
        assert_eq!(cli.ignore.modules, vec!["HealthModule", "MetricsModule"]);
        assert_eq!(cli.ignore.components, vec!["Reflector"]);
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(TestCli::try_parse_from(["spelunk", "--renderer", "mermaid"]).is_err());
    }

    #[test]
    fn test_renderer_config_defaults_and_overrides() {
        let defaults = RendererOptions::default();
        assert_eq!(defaults.renderer_config(), RendererConfig::new("plantuml", ["-pipe", "-tsvg"]));

        let program_only = RendererOptions {
            format: DiagramFormat::Dot,
            program: Some("/opt/graphviz/bin/dot".to_string()),
            args: None,
        };
        assert_eq!(
            program_only.renderer_config(),
            RendererConfig::new("/opt/graphviz/bin/dot", ["-Tsvg"])
        );

        let full = RendererOptions {
            format: DiagramFormat::PlantUml,
            program: Some("java".to_string()),
            args: Some("-jar plantuml.jar -pipe -tsvg".to_string()),
        };
        assert_eq!(
            full.renderer_config(),
            RendererConfig::new("java", ["-jar", "plantuml.jar", "-pipe", "-tsvg"])
        );
    }

    #[test]
    fn test_nailgun_client_as_renderer() {
        let cli = TestCli::parse_from([
            "spelunk",
            "--renderer-cmd",
            "ng",
            "--renderer-args",
            "net.sourceforge.plantuml.Run -pipe -tsvg",
        ]);
        assert_eq!(
            cli.renderer.renderer_config(),
            RendererConfig::new("ng", ["net.sourceforge.plantuml.Run", "-pipe", "-tsvg"])
        );
    }

    #[test]
    fn test_ignores_extend_builtins() {
        let ignores = IgnoreOptions {
            components: vec!["ConfigService".to_string()],
            modules: vec!["HealthModule".to_string()],
        };
        let options = ignores.filter_options();

        assert!(options.ignore_components.contains("ConfigService"));
        assert!(options.ignore_components.contains(spelunk_collect::BUILTIN_IGNORED_COMPONENT));
        assert!(options.ignore_modules.contains("HealthModule"));
        assert!(options.ignore_modules.contains(spelunk_collect::BUILTIN_IGNORED_MODULE));
    }
}
