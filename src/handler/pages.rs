//! Page rendering module
//!
//! Renders the game's index page template. The template takes no variables;
//! rendering exists so the page can later grow server-side values without
//! changing the handler contract.

use crate::config::ResourcesConfig;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use minijinja::Environment;
use std::sync::Arc;

/// Template engine wrapper, constructed once at startup
pub struct PageEngine {
    env: Environment<'static>,
    index_template: String,
}

impl PageEngine {
    pub fn new(resources: &ResourcesConfig) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&resources.template_dir));

        Self {
            env,
            index_template: resources.index_template.clone(),
        }
    }

    /// Render the index template with an empty context
    pub fn render_index(&self) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(&self.index_template)?;
        template.render(minijinja::context! {})
    }

    /// Render once at startup so a missing template is visible immediately
    /// instead of on the first request. Startup continues either way.
    pub fn self_check(&self) {
        if let Err(e) = self.render_index() {
            logger::log_warning(&format!(
                "Index template '{}' failed to render: {e}",
                self.index_template
            ));
        }
    }
}

/// Serve the rendered index page
pub fn serve_index(
    ctx: &RequestContext<'_>,
    state: &Arc<crate::config::AppState>,
) -> Response<Full<Bytes>> {
    match state.templates.render_index() {
        Ok(html) => http::response::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render index template: {e}"));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_for(dir: &std::path::Path) -> PageEngine {
        PageEngine::new(&ResourcesConfig {
            template_dir: dir.to_str().expect("utf-8 path").to_string(),
            index_template: "index.html".to_string(),
            static_dir: "static".to_string(),
            static_route: "/static".to_string(),
        })
    }

    #[test]
    fn test_render_existing_template() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("index.html"),
            "<!DOCTYPE html>\n<html><body><canvas id=\"game\"></canvas></body></html>\n",
        )
        .expect("write template");

        let engine = engine_for(dir.path());
        let html = engine.render_index().expect("render");
        assert!(html.contains("<canvas id=\"game\">"));
    }

    #[test]
    fn test_missing_template_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = engine_for(dir.path());
        assert!(engine.render_index().is_err());
    }

    #[test]
    fn test_template_syntax_error_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "{% broken").expect("write template");

        let engine = engine_for(dir.path());
        assert!(engine.render_index().is_err());
    }
}
