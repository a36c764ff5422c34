//! Route handlers.

use std::time::Instant;

use axum::extract::{Query, RawQuery, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use tracing::info;

use spelunk_collect::dependency_tree;
use spelunk_core::Module;
use spelunk_uml::serialize;

use crate::error::ApiError;
use crate::query::DepsQuery;
use crate::state::AppState;

/// `GET /deps/full.svg`
///
/// The renderer output is collected before replying so a failed render
/// never leaves a truncated image behind a 200 status.
pub async fn full_image(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let options = DepsQuery::from_pairs(pairs)?.apply(&state.config().base_options);

    let tree = dependency_tree(state.registry(), &options);
    let markup = serialize(&tree, state.config().format);
    let image = state.renderer().render(markup)?.read_all().await?;

    info!(
        focus = ?options.focus(),
        flatten = options.flatten_storage,
        modules = tree.len(),
        bytes = image.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "rendered dependency image"
    );
    Ok(([(header::CONTENT_TYPE, state.renderer().content_type())], image).into_response())
}

#[derive(Serialize)]
struct PageData<'a> {
    image_src: String,
    url: String,
    modules: &'a [Module],
    version: &'static str,
}

/// `GET /deps`
///
/// Lists the unfocused tree and points the image at the same query string.
pub async fn main_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(hostname)
        .unwrap_or("localhost");

    let url = format!("http://{host}:{}/deps", state.config().port);
    let image_src = format!("{url}/full.svg?{}", query.unwrap_or_default());
    let modules = dependency_tree(state.registry(), &state.config().base_options);

    let html = state.render_page(&PageData {
        image_src,
        url,
        modules: &modules,
        version: state.version(),
    })?;
    Ok(Html(html))
}

/// Strip the port from a `Host` header value.
fn hostname(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.split_once(':') {
        Some((name, _)) => name,
        None => host,
    }
}
