//! Startup configuration shared read-only by every request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::info;

use spelunk_collect::FilterOptions;
use spelunk_core::ComponentRegistry;
use spelunk_error::{Error, Result};
use spelunk_render::DiagramRenderer;
use spelunk_uml::DiagramFormat;

use crate::VERSION;

/// Name of the selection page template.
pub const PAGE_TEMPLATE: &str = "dep-select";

const DEFAULT_PAGE: &str = include_str!("../templates/dep-select.hbs");

/// Server settings fixed at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port written into absolute URLs on the selection page.
    pub port: u16,
    pub format: DiagramFormat,
    /// Directory that may hold a `dep-select.hbs` override.
    pub views_dir: Option<PathBuf>,
    /// Process-wide filter options; requests only add to them.
    pub base_options: FilterOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            format: DiagramFormat::default(),
            views_dir: None,
            base_options: FilterOptions::default(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<dyn ComponentRegistry>,
    renderer: Arc<dyn DiagramRenderer>,
    templates: Handlebars<'static>,
    config: ServerConfig,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn ComponentRegistry>,
        renderer: Arc<dyn DiagramRenderer>,
        config: ServerConfig,
    ) -> Result<Self> {
        let templates = load_templates(config.views_dir.as_deref())?;
        Ok(Self {
            inner: Arc::new(Inner {
                registry,
                renderer,
                templates,
                config,
            }),
        })
    }

    pub fn registry(&self) -> &dyn ComponentRegistry {
        self.inner.registry.as_ref()
    }

    pub fn renderer(&self) -> &dyn DiagramRenderer {
        self.inner.renderer.as_ref()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Render the selection page.
    pub fn render_page<T: Serialize>(&self, data: &T) -> Result<String> {
        self.inner
            .templates
            .render(PAGE_TEMPLATE, data)
            .map_err(|err| Error::template_failed(err.to_string()).with_operation("page::render"))
    }
}

/// `{{urlencode value}}`: percent-encode a value for a query string.
fn urlencode_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&urlencoding::encode(param))?;
    Ok(())
}

fn load_templates(views_dir: Option<&Path>) -> Result<Handlebars<'static>> {
    let mut templates = Handlebars::new();
    templates.register_helper("urlencode", Box::new(urlencode_helper));

    let custom = views_dir
        .map(|dir| dir.join(format!("{PAGE_TEMPLATE}.hbs")))
        .filter(|path| path.is_file());

    match custom {
        Some(path) => {
            templates
                .register_template_file(PAGE_TEMPLATE, &path)
                .map_err(|err| {
                    Error::template_failed(err.to_string())
                        .with_operation("page::load")
                        .with_context("path", path.display().to_string())
                })?;
            info!(path = %path.display(), "using custom page template");
        }
        None => {
            templates
                .register_template_string(PAGE_TEMPLATE, DEFAULT_PAGE)
                .map_err(|err| Error::template_failed(err.to_string()).with_operation("page::load"))?;
        }
    }

    Ok(templates)
}
