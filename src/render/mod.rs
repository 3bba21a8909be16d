//! Page renderer
//!
//! This module renders view snapshots to HTML using Tera.
//! Features:
//! - Templates embedded in the binary
//! - Per-name template overrides from a directory on disk
//! - Standard template variables
//! - Fallback to an error page when a template fails

use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::{Context as TeraContext, Tera};

use crate::config::SiteConfig;
use crate::views::{CategoryDetailSnapshot, CategoryListSnapshot};

mod error;

pub use error::RenderError;

/// Category grid page
pub const CATEGORIES_TEMPLATE: &str = "categories.html";
/// Ranked nominee page
pub const CATEGORY_TEMPLATE: &str = "category.html";
/// Unknown route page
pub const NOT_FOUND_TEMPLATE: &str = "not_found.html";
/// Page shown when another template fails to render
pub const ERROR_TEMPLATE: &str = "error.html";

#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.html"]
struct EmbeddedTemplates;

/// Variables injected into every page
#[derive(Debug, Clone, Serialize)]
pub struct StandardTemplateVars {
    pub site_title: String,
    pub site_tagline: String,
    pub request_path: String,
    pub version: &'static str,
}

impl StandardTemplateVars {
    pub fn new(site: &SiteConfig, request_path: impl Into<String>) -> Self {
        Self {
            site_title: site.title.clone(),
            site_tagline: site.tagline.clone(),
            request_path: request_path.into(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Renders pages for the web layer
pub struct PageRenderer {
    tera: Tera,
    site: SiteConfig,
}

impl PageRenderer {
    /// Build a renderer from the embedded templates plus any overrides
    /// found in `site.templates_dir`.
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let mut templates = embedded_templates()?;

        if let Some(dir) = &site.templates_dir {
            let mut overrides = BTreeMap::new();
            collect_templates_from_dir(dir, dir, &mut overrides)
                .with_context(|| format!("Failed to read templates from {}", dir.display()))?;
            tracing::info!(
                dir = %dir.display(),
                count = overrides.len(),
                "Loaded template overrides"
            );
            templates.extend(overrides);
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| RenderError::TemplateError(error_chain("templates", &e)))
            .context("Failed to compile templates")?;

        Ok(Self {
            tera,
            site: site.clone(),
        })
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            if matches!(e.kind, tera::ErrorKind::TemplateNotFound(_)) {
                return RenderError::NotFound(template.to_string()).into();
            }
            RenderError::TemplateError(error_chain(template, &e)).into()
        })
    }

    /// Render a template with the standard variables added
    pub fn render_with_standard_vars(
        &self,
        template: &str,
        context: &TeraContext,
        request_path: &str,
    ) -> Result<String> {
        let mut full_context = context.clone();
        full_context.insert("page", &StandardTemplateVars::new(&self.site, request_path));
        self.render(template, &full_context)
    }

    /// Render the category grid
    pub fn render_category_list(
        &self,
        snapshot: &CategoryListSnapshot,
        request_path: &str,
    ) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("list", snapshot);
        self.render_with_standard_vars(CATEGORIES_TEMPLATE, &context, request_path)
    }

    /// Render the ranked nominee page
    pub fn render_category_detail(
        &self,
        snapshot: &CategoryDetailSnapshot,
        request_path: &str,
    ) -> Result<String> {
        let mut context = TeraContext::new();
        context.insert("detail", snapshot);
        self.render_with_standard_vars(CATEGORY_TEMPLATE, &context, request_path)
    }

    /// Render the not-found page; never fails
    pub fn render_not_found(&self, request_path: &str) -> String {
        let mut context = TeraContext::new();
        context.insert("page", &StandardTemplateVars::new(&self.site, request_path));
        self.render_with_fallback(NOT_FOUND_TEMPLATE, &context)
    }

    /// Render a template, falling back to `error.html` and then to a
    /// static page if that fails too.
    pub fn render_with_fallback(&self, template: &str, context: &TeraContext) -> String {
        match self.render(template, context) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to render template '{}': {}, trying error template", template, e);

                match self.render(ERROR_TEMPLATE, context) {
                    Ok(html) => html,
                    Err(error_template_err) => {
                        tracing::warn!("Failed to render error template: {}", error_template_err);
                        simple_error_page(&self.site.title)
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

fn embedded_templates() -> Result<BTreeMap<String, String>> {
    let mut templates = BTreeMap::new();
    for name in EmbeddedTemplates::iter() {
        let file = EmbeddedTemplates::get(&name)
            .ok_or_else(|| RenderError::NotFound(name.to_string()))?;
        let content = String::from_utf8(file.data.into_owned())
            .map_err(|_| RenderError::InvalidEncoding(name.to_string()))?;
        templates.insert(name.to_string(), content);
    }
    Ok(templates)
}

/// Collect `*.html` files under `current_path`, named relative to `base_path`
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut BTreeMap<String, String>,
) -> Result<()> {
    for entry in fs::read_dir(current_path)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }

        let relative = path
            .strip_prefix(base_path)
            .with_context(|| format!("Template outside {}", base_path.display()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        templates.insert(name, content);
    }
    Ok(())
}

fn error_chain(template: &str, e: &tera::Error) -> String {
    let mut error_msg = format!("Failed to render '{}': {}", template, e);
    let mut source = e.source();
    while let Some(s) = source {
        error_msg.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    error_msg
}

/// Last-resort page when even `error.html` cannot render
fn simple_error_page(title: &str) -> String {
    let title = tera::escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>{}</title></head>
<body>
    <h1>Something went wrong</h1>
    <p>This page could not be displayed. Please try again later.</p>
    <p><a href="/">Back to Categories</a></p>
</body>
</html>"#,
        title
    )
}
