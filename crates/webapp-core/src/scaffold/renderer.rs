//! Entry-file (index.html) rendering

use crate::error::ScaffoldError;
use crate::integrations::{Integration, IntegrationSet};
use std::path::Path;

pub const STYLESHEETS_PLACEHOLDER: &str = "<!-- Stylesheets here -->";
pub const SCRIPTS_PLACEHOLDER: &str = "<!-- Scripts here -->";

/// Template bundled with the binary
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Order in which integrations contribute tags
const RENDER_ORDER: [Integration; 5] = [
    Integration::Barbajs,
    Integration::Jquery,
    Integration::Bootstrap,
    Integration::Modernizr,
    Integration::SlickCarousel,
];

/// Tags injected into the two placeholder regions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

fn script_tag(file: &str) -> String {
    format!(r#"<script src="scripts/{}"></script>"#, file)
}

fn stylesheet_tag(file: &str) -> String {
    format!(r#"<link rel="stylesheet" href="styles/{}">"#, file)
}

/// Collect the tags implied by `integrations`
///
/// Sass sources are not linked: a browser cannot load them until the build
/// pipeline compiles them.
pub fn markup(integrations: &IntegrationSet) -> Markup {
    let sass = integrations.uses_sass();
    let mut out = Markup::default();

    for integration in RENDER_ORDER {
        if !integrations.contains(integration) {
            continue;
        }
        let entry = integration.entry();
        if let Some(style) = &entry.style {
            let dest = style.dest_for(sass);
            if dest.ends_with(".css") {
                out.stylesheets.push(stylesheet_tag(dest));
            }
        }
        if let Some(script) = &entry.script {
            out.scripts.push(script_tag(script.dest));
        }
    }

    out
}

/// Leading whitespace of the line containing `needle`
fn indent_of<'a>(template: &'a str, needle: &str) -> &'a str {
    template
        .lines()
        .find(|line| line.contains(needle))
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .unwrap_or("")
}

fn fill(template: &str, placeholder: &str, tags: &[String]) -> String {
    let separator = format!("\n{}", indent_of(template, placeholder));
    template.replacen(placeholder, &tags.join(&separator), 1)
}

/// Replace both placeholders with the tags for `integrations`
pub fn render(template: &str, integrations: &IntegrationSet) -> String {
    let markup = markup(integrations);
    let html = fill(template, STYLESHEETS_PLACEHOLDER, &markup.stylesheets);
    fill(&html, SCRIPTS_PLACEHOLDER, &markup.scripts)
}

/// Load the override template when given, else the bundled one
pub async fn load_template(path: Option<&Path>) -> Result<String, ScaffoldError> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScaffoldError::Template {
                path: path.to_path_buf(),
                source,
            }),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}
