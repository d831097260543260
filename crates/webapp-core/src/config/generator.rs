//! Build pipeline configuration file generation (package.json, gulpfile.js, tasks)

use crate::error::ScaffoldError;
use crate::integrations::{Delivery, Integration, IntegrationSet, ProjectDescriptor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Gulp tooling every pipeline depends on
const BASE_TOOLING: &[&str] = &[
    "browser-sync",
    "gulp",
    "gulp-clean-css",
    "gulp-concat",
    "gulp-rename",
    "gulp-uglify",
];

const SASS_TOOLING: &[&str] = &["gulp-sass", "sass"];

const BABEL_TOOLING: &[&str] = &["@babel/core", "@babel/preset-env", "gulp-babel"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    name: String,
    version: &'static str,
    private: bool,
    description: String,
    scripts: BTreeMap<&'static str, &'static str>,
    dependencies: BTreeMap<String, &'static str>,
    dev_dependencies: BTreeMap<String, &'static str>,
}

/// Convert a project name into a valid npm package name
pub fn npm_package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' | '_' | '.' => out.push(c),
            'A'..='Z' => out.push(c.to_ascii_lowercase()),
            _ if !out.ends_with('-') => out.push('-'),
            _ => {}
        }
    }
    let trimmed = out.trim_matches(|c| c == '-' || c == '.' || c == '_');
    if trimmed.is_empty() {
        "webapp".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Dev dependencies for the pipeline flavor in `integrations`
pub fn tooling_packages(integrations: &IntegrationSet) -> Vec<&'static str> {
    let mut packages: Vec<&'static str> = BASE_TOOLING.to_vec();
    if integrations.contains(Integration::Sass) {
        packages.extend(SASS_TOOLING);
    }
    if integrations.contains(Integration::Babel) {
        packages.extend(BABEL_TOOLING);
    }
    packages.sort_unstable();
    packages
}

/// Render the project's package.json
///
/// Library integrations are forwarded as runtime dependencies so the pipeline
/// install fetches them into the project's node_modules.
pub fn package_json(
    project: &ProjectDescriptor,
    integrations: &IntegrationSet,
) -> Result<String, serde_json::Error> {
    let dependencies = match integrations.delivery() {
        Delivery::BuildPipeline => integrations
            .packages()
            .into_iter()
            .map(|name| (name, "*"))
            .collect(),
        Delivery::Direct => BTreeMap::new(),
    };

    let dev_dependencies = tooling_packages(integrations)
        .into_iter()
        .map(|name| (name.to_string(), "*"))
        .collect();

    let manifest = PackageJson {
        name: npm_package_name(project.name()),
        version: "1.0.0",
        private: true,
        description: String::new(),
        scripts: BTreeMap::from([("build", "gulp build"), ("start", "gulp serve")]),
        dependencies,
        dev_dependencies,
    };

    let mut content = serde_json::to_string_pretty(&manifest)?;
    content.push('\n');
    Ok(content)
}

/// Render gulpfile.js composing the script and style tasks
pub fn gulpfile(integrations: &IntegrationSet) -> String {
    let style_ext = if integrations.uses_sass() { "scss" } else { "css" };
    format!(
        r#"const {{ parallel, series, watch }} = require("gulp");
const browserSync = require("browser-sync").create();
const scripts = require("./gulp/tasks/scripts");
const styles = require("./gulp/tasks/styles");

function reload(done) {{
    browserSync.reload();
    done();
}}

function serve() {{
    browserSync.init({{ server: {{ baseDir: "./" }} }});
    watch("scripts/main.js", series(scripts, reload));
    watch("styles/main.{style_ext}", series(styles, reload));
    watch("index.html").on("change", browserSync.reload);
}}

const build = parallel(scripts, styles);

exports.scripts = scripts;
exports.styles = styles;
exports.build = build;
exports.serve = series(build, serve);
exports.default = build;
"#
    )
}

/// Render gulp/tasks/scripts.js
pub fn scripts_task(integrations: &IntegrationSet) -> String {
    let babel = integrations.contains(Integration::Babel);
    let (babel_require, babel_pipe) = if babel {
        (
            "const babel = require(\"gulp-babel\");\n",
            "        .pipe(babel({ presets: [\"@babel/preset-env\"] }))\n",
        )
    } else {
        ("", "")
    };
    format!(
        r#"const {{ src, dest }} = require("gulp");
{babel_require}const uglify = require("gulp-uglify");
const rename = require("gulp-rename");

function scripts() {{
    return src("scripts/main.js")
{babel_pipe}        .pipe(uglify())
        .pipe(rename({{ suffix: ".min" }}))
        .pipe(dest("dist/scripts"));
}}

module.exports = scripts;
"#
    )
}

/// Render gulp/tasks/styles.js
pub fn styles_task(integrations: &IntegrationSet) -> String {
    if integrations.uses_sass() {
        r#"const { src, dest } = require("gulp");
const sass = require("gulp-sass")(require("sass"));
const cleanCSS = require("gulp-clean-css");
const rename = require("gulp-rename");

function styles() {
    return src("styles/main.scss")
        .pipe(sass().on("error", sass.logError))
        .pipe(cleanCSS())
        .pipe(rename({ suffix: ".min" }))
        .pipe(dest("dist/styles"));
}

module.exports = styles;
"#
        .to_string()
    } else {
        r#"const { src, dest } = require("gulp");
const cleanCSS = require("gulp-clean-css");
const rename = require("gulp-rename");

function styles() {
    return src("styles/main.css")
        .pipe(cleanCSS())
        .pipe(rename({ suffix: ".min" }))
        .pipe(dest("dist/styles"));
}

module.exports = styles;
"#
        .to_string()
    }
}

async fn write_file(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    fs::write(path, content)
        .await
        .map_err(|source| ScaffoldError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Write the build pipeline files into the project root
///
/// Returns the written paths relative to the project root.
pub async fn write_pipeline(
    project: &ProjectDescriptor,
    integrations: &IntegrationSet,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    let root = project.destination_path();
    let tasks_dir = root.join("gulp").join("tasks");
    fs::create_dir_all(&tasks_dir)
        .await
        .map_err(|source| ScaffoldError::CreateDir {
            path: tasks_dir.clone(),
            source,
        })?;

    let files = [
        (PathBuf::from("package.json"), package_json(project, integrations)?),
        (PathBuf::from("gulpfile.js"), gulpfile(integrations)),
        (
            PathBuf::from("gulp").join("tasks").join("scripts.js"),
            scripts_task(integrations),
        ),
        (
            PathBuf::from("gulp").join("tasks").join("styles.js"),
            styles_task(integrations),
        ),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (relative, content) in files {
        write_file(&root.join(&relative), &content).await?;
        written.push(relative);
    }

    Ok(written)
}
