//! Copies fetched package assets into the project layout
//!
//! Every library integration gets its own task on a `JoinSet`. Each task
//! settles into exactly one `IntegrationOutcome`, including tasks that panic.

use crate::error::MaterializeError;
use crate::integrations::{
    CatalogEntry, Integration, IntegrationSet, ProjectDescriptor, ScriptSource, StyleSource,
};
use crate::scaffold::report::IntegrationOutcome;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command as TokioCommand;
use tokio::task::JoinSet;

/// Where packages were fetched and where their assets go
#[derive(Debug, Clone)]
pub struct MaterializeContext {
    /// Directory containing `node_modules`
    pub source_root: PathBuf,
    /// Project root; assets land in its scripts/ and styles/
    pub project_root: PathBuf,
    /// Use Sass sources where a package provides them
    pub sass: bool,
}

impl MaterializeContext {
    pub fn new(project: &ProjectDescriptor, source_root: &Path, sass: bool) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            project_root: project.destination_path().to_path_buf(),
            sass,
        }
    }

    fn package_dir(&self, entry: &CatalogEntry) -> PathBuf {
        self.source_root.join("node_modules").join(entry.package_name)
    }
}

async fn read_manifest(
    integration: Integration,
    package_dir: &Path,
) -> Result<Value, MaterializeError> {
    let path = package_dir.join("package.json");
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| MaterializeError::Manifest {
            integration,
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
    serde_json::from_str(&content).map_err(|e| MaterializeError::Manifest {
        integration,
        reason: e.to_string(),
    })
}

fn manifest_field<'a>(
    integration: Integration,
    manifest: &'a Value,
    field: &str,
) -> Result<&'a str, MaterializeError> {
    manifest
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| MaterializeError::Manifest {
            integration,
            reason: format!("missing \"{}\" field", field),
        })
}

/// Script entry from `main`, defaulting to index.js like npm does
fn main_entry(manifest: &Value) -> &str {
    manifest
        .get("main")
        .and_then(Value::as_str)
        .unwrap_or("index.js")
}

/// `dist/js/bootstrap` or `dist/js/bootstrap.js` -> `dist/js/bootstrap.bundle.js`
fn bundle_entry(main: &str) -> String {
    format!("{}.bundle.js", main.strip_suffix(".js").unwrap_or(main))
}

/// Resolve a `bin` entry, which npm allows as a string or a name map
fn bin_entry<'a>(manifest: &'a Value, name: &str) -> Option<&'a str> {
    match manifest.get("bin")? {
        Value::String(path) => Some(path.as_str()),
        Value::Object(map) => map.get(name).and_then(Value::as_str),
        _ => None,
    }
}

async fn copy(
    integration: Integration,
    from: PathBuf,
    to: &Path,
) -> Result<(), MaterializeError> {
    match fs::copy(&from, to).await {
        Ok(_) => Ok(()),
        Err(source) => Err(MaterializeError::Copy {
            integration,
            from,
            source,
        }),
    }
}

/// Run the package's own build binary with `node`, writing into scripts/
async fn run_build(
    integration: Integration,
    package_dir: &Path,
    manifest: &Value,
    bin: &str,
    config: &str,
    scripts_dir: &Path,
    dest: &Path,
) -> Result<(), MaterializeError> {
    let bin_path = bin_entry(manifest, bin).ok_or_else(|| MaterializeError::Manifest {
        integration,
        reason: format!("missing \"bin.{}\" entry", bin),
    })?;

    let output = TokioCommand::new("node")
        .arg(package_dir.join(bin_path))
        .arg("-c")
        .arg(package_dir.join(config))
        .current_dir(scripts_dir)
        .output()
        .await
        .map_err(|e| MaterializeError::Build {
            integration,
            output: format!("failed to start node: {}", e),
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return Err(MaterializeError::Build {
            integration,
            output: stderr.trim().to_string(),
        });
    }
    if !output.status.success() {
        return Err(MaterializeError::Build {
            integration,
            output: format!("exit code {}", output.status.code().unwrap_or(-1)),
        });
    }
    if !dest.is_file() {
        return Err(MaterializeError::Build {
            integration,
            output: format!("{} was not produced", dest.display()),
        });
    }

    Ok(())
}

async fn copy_assets(
    entry: &CatalogEntry,
    package_dir: &Path,
    ctx: &MaterializeContext,
) -> Result<Vec<PathBuf>, MaterializeError> {
    let integration = entry.integration;
    let manifest = read_manifest(integration, package_dir).await?;
    let scripts_dir = ctx.project_root.join("scripts");
    let styles_dir = ctx.project_root.join("styles");
    let mut copied = Vec::new();

    if let Some(script) = &entry.script {
        let dest = scripts_dir.join(script.dest);
        match script.source {
            ScriptSource::Main => {
                copy(integration, package_dir.join(main_entry(&manifest)), &dest).await?;
            }
            ScriptSource::MainBundle => {
                let bundle = bundle_entry(main_entry(&manifest));
                copy(integration, package_dir.join(bundle), &dest).await?;
            }
            ScriptSource::Build { bin, config } => {
                run_build(
                    integration,
                    package_dir,
                    &manifest,
                    bin,
                    config,
                    &scripts_dir,
                    &dest,
                )
                .await?;
            }
        }
        copied.push(Path::new("scripts").join(script.dest));
    }

    if let Some(style) = &entry.style {
        let source = match style.source {
            StyleSource::Manifest { field, sass_field } => {
                let field = match sass_field {
                    Some(sass_field) if ctx.sass => sass_field,
                    _ => field,
                };
                manifest_field(integration, &manifest, field)?.to_string()
            }
            StyleSource::Fixed(path) => path.to_string(),
        };
        let dest_name = style.dest_for(ctx.sass);
        copy(integration, package_dir.join(source), &styles_dir.join(dest_name)).await?;
        copied.push(Path::new("styles").join(dest_name));
    }

    Ok(copied)
}

/// Best-effort removal of every file this entry may have written
pub async fn rollback(entry: &CatalogEntry, project_root: &Path) {
    for file in entry.destination_files() {
        let _ = fs::remove_file(project_root.join(file)).await;
    }
}

/// Set up one integration, rolling back its files on failure
pub async fn materialize(
    entry: &'static CatalogEntry,
    ctx: &MaterializeContext,
) -> Result<Vec<PathBuf>, MaterializeError> {
    let package_dir = ctx.package_dir(entry);
    if !fs::try_exists(&package_dir).await.unwrap_or(false) {
        return Err(MaterializeError::MissingPackage(entry.integration));
    }

    let result = copy_assets(entry, &package_dir, ctx).await;
    if result.is_err() {
        rollback(entry, &ctx.project_root).await;
    }
    result
}

/// Run every library integration concurrently and wait for all of them to settle
///
/// Returns one outcome per library integration, in catalog order.
pub async fn materialize_all(
    integrations: &IntegrationSet,
    ctx: &MaterializeContext,
) -> Vec<IntegrationOutcome> {
    let mut tasks = JoinSet::new();
    let mut pending: BTreeSet<Integration> = BTreeSet::new();

    for integration in integrations.libraries() {
        let ctx = ctx.clone();
        let entry = integration.entry();
        pending.insert(integration);
        tasks.spawn(async move { (integration, materialize(entry, &ctx).await) });
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    while let Some(joined) = tasks.join_next().await {
        if let Ok((integration, result)) = joined {
            pending.remove(&integration);
            outcomes.push(IntegrationOutcome {
                integration,
                result,
            });
        }
    }

    // Tasks that panicked never returned their integration
    for integration in pending {
        rollback(integration.entry(), &ctx.project_root).await;
        outcomes.push(IntegrationOutcome {
            integration,
            result: Err(MaterializeError::Aborted(integration)),
        });
    }

    outcomes.sort_by_key(|o| o.integration);
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        _temp: tempfile::TempDir,
        project: ProjectDescriptor,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = tempfile::tempdir().unwrap();
            let project = ProjectDescriptor::new("demo", temp.path()).unwrap();
            for dir in ["temp", "scripts", "styles"] {
                std::fs::create_dir_all(project.destination_path().join(dir)).unwrap();
            }
            Self {
                _temp: temp,
                project,
            }
        }

        fn package(&self, name: &str, manifest: &str, files: &[&str]) {
            let dir = self.project.scratch_dir().join("node_modules").join(name);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("package.json"), manifest).unwrap();
            for file in files {
                let path = dir.join(file);
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(path, format!("/* {} */", file)).unwrap();
            }
        }

        /// Package with a `bin.modernizr` script whose body is `script`
        fn modernizr(&self, script: &str) {
            self.package(
                "modernizr",
                r#"{ "bin": { "modernizr": "bin/modernizr" } }"#,
                &["lib/config-all.json"],
            );
            let bin = self.project.scratch_dir().join("node_modules/modernizr/bin/modernizr");
            std::fs::create_dir_all(bin.parent().unwrap()).unwrap();
            std::fs::write(bin, script).unwrap();
        }

        fn ctx(&self, sass: bool) -> MaterializeContext {
            MaterializeContext::new(&self.project, &self.project.scratch_dir(), sass)
        }

        fn root(&self) -> &Path {
            self.project.destination_path()
        }
    }

    fn set(items: &[Integration]) -> IntegrationSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_bundle_entry() {
        assert_eq!(bundle_entry("dist/js/bootstrap"), "dist/js/bootstrap.bundle.js");
        assert_eq!(bundle_entry("dist/js/bootstrap.js"), "dist/js/bootstrap.bundle.js");
    }

    #[test]
    fn test_bin_entry_forms() {
        let single: Value = serde_json::json!({ "bin": "bin/modernizr" });
        let map: Value = serde_json::json!({ "bin": { "modernizr": "bin/modernizr" } });
        assert_eq!(bin_entry(&single, "modernizr"), Some("bin/modernizr"));
        assert_eq!(bin_entry(&map, "modernizr"), Some("bin/modernizr"));
        assert_eq!(bin_entry(&map, "other"), None);
    }

    #[tokio::test]
    async fn test_jquery_copied_from_main() {
        let fx = Fixture::new();
        fx.package("jquery", r#"{ "main": "dist/jquery.js" }"#, &["dist/jquery.js"]);

        let copied = materialize(Integration::Jquery.entry(), &fx.ctx(false))
            .await
            .unwrap();

        assert_eq!(copied, vec![PathBuf::from("scripts/jquery.js")]);
        let content = std::fs::read_to_string(fx.root().join("scripts/jquery.js")).unwrap();
        assert_eq!(content, "/* dist/jquery.js */");
    }

    #[tokio::test]
    async fn test_bootstrap_bundle_and_style() {
        let fx = Fixture::new();
        fx.package(
            "bootstrap",
            r#"{ "main": "dist/js/bootstrap", "style": "dist/css/bootstrap.css", "sass": "scss/bootstrap.scss" }"#,
            &["dist/js/bootstrap.bundle.js", "dist/css/bootstrap.css", "scss/bootstrap.scss"],
        );

        materialize(Integration::Bootstrap.entry(), &fx.ctx(false))
            .await
            .unwrap();
        assert!(fx.root().join("scripts/bootstrap.bundle.js").is_file());
        assert!(fx.root().join("styles/bootstrap.css").is_file());

        materialize(Integration::Bootstrap.entry(), &fx.ctx(true))
            .await
            .unwrap();
        let scss = std::fs::read_to_string(fx.root().join("styles/bootstrap.scss")).unwrap();
        assert_eq!(scss, "/* scss/bootstrap.scss */");
    }

    #[tokio::test]
    async fn test_slick_uses_fixed_style_path() {
        let fx = Fixture::new();
        fx.package(
            "slick-carousel",
            r#"{ "main": "slick/slick.js" }"#,
            &["slick/slick.js", "slick/slick.css"],
        );

        let copied = materialize(Integration::SlickCarousel.entry(), &fx.ctx(false))
            .await
            .unwrap();

        assert_eq!(
            copied,
            vec![PathBuf::from("scripts/slick.js"), PathBuf::from("styles/slick.css")]
        );
    }

    #[tokio::test]
    async fn test_missing_package_is_a_failure_outcome() {
        let fx = Fixture::new();
        let err = materialize(Integration::Barbajs.entry(), &fx.ctx(false))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error setting up Barba.js");
    }

    #[tokio::test]
    async fn test_failed_style_copy_rolls_back_script() {
        let fx = Fixture::new();
        // Style file is declared but not shipped
        fx.package(
            "bootstrap",
            r#"{ "main": "dist/js/bootstrap.js", "style": "dist/css/bootstrap.css" }"#,
            &["dist/js/bootstrap.bundle.js"],
        );
        std::fs::write(fx.root().join("scripts/jquery.js"), "unrelated").unwrap();

        let err = materialize(Integration::Bootstrap.entry(), &fx.ctx(false))
            .await
            .unwrap_err();

        assert!(matches!(err, MaterializeError::Copy { .. }));
        assert!(!fx.root().join("scripts/bootstrap.bundle.js").exists());
        assert!(!fx.root().join("styles/bootstrap.css").exists());
        // Other integrations' files are untouched
        assert!(fx.root().join("scripts/jquery.js").exists());
    }

    #[tokio::test]
    async fn test_invalid_manifest_fails() {
        let fx = Fixture::new();
        fx.package("jquery", "not json", &[]);
        let err = materialize(Integration::Jquery.entry(), &fx.ctx(false))
            .await
            .unwrap_err();
        assert!(matches!(err, MaterializeError::Manifest { .. }));
    }

    #[tokio::test]
    async fn test_join_settles_every_routine_with_partial_failures() {
        let fx = Fixture::new();
        fx.package("jquery", r#"{ "main": "dist/jquery.js" }"#, &["dist/jquery.js"]);
        fx.package("barba.js", r#"{ "main": "dist/barba.js" }"#, &["dist/barba.js"]);
        // bootstrap and slick-carousel were never fetched

        let integrations = set(&[
            Integration::Bootstrap,
            Integration::Barbajs,
            Integration::SlickCarousel,
            Integration::Gulp,
        ]);
        let outcomes = materialize_all(&integrations, &fx.ctx(false)).await;

        let order: Vec<Integration> = outcomes.iter().map(|o| o.integration).collect();
        assert_eq!(
            order,
            vec![
                Integration::Jquery,
                Integration::Bootstrap,
                Integration::Barbajs,
                Integration::SlickCarousel,
            ]
        );
        let failed: Vec<Integration> = outcomes
            .iter()
            .filter(|o| !o.is_ok())
            .map(|o| o.integration)
            .collect();
        assert_eq!(failed, vec![Integration::Bootstrap, Integration::SlickCarousel]);
    }

    #[tokio::test]
    async fn test_join_with_nothing_to_do() {
        let fx = Fixture::new();
        let outcomes = materialize_all(&set(&[Integration::Sass]), &fx.ctx(true)).await;
        assert!(outcomes.is_empty());
    }

    /// The build routine shells out to node; skip where it is not installed
    #[cfg(unix)]
    fn node_available() -> bool {
        crate::runtime::check::check_node().available
    }

    #[tokio::test]
    async fn test_modernizr_without_bin_entry() {
        let fx = Fixture::new();
        fx.package("modernizr", r#"{ "main": "lib/cli.js" }"#, &["lib/config-all.json"]);

        let err = materialize(Integration::Modernizr.entry(), &fx.ctx(false))
            .await
            .unwrap_err();
        assert!(matches!(err, MaterializeError::Manifest { .. }));
        assert!(err.to_string().contains("bin.modernizr"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_modernizr_build_writes_script() {
        if !node_available() {
            return;
        }
        let fx = Fixture::new();
        fx.modernizr(r#"require("fs").writeFileSync("modernizr.js", "/* modernizr */");"#);

        let copied = materialize(Integration::Modernizr.entry(), &fx.ctx(false))
            .await
            .unwrap();
        assert_eq!(copied, vec![PathBuf::from("scripts/modernizr.js")]);
        let content = std::fs::read_to_string(fx.root().join("scripts/modernizr.js")).unwrap();
        assert_eq!(content, "/* modernizr */");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_modernizr_stderr_fails_and_rolls_back() {
        if !node_available() {
            return;
        }
        let fx = Fixture::new();
        fx.modernizr(
            r#"require("fs").writeFileSync("modernizr.js", "partial");
process.stderr.write("unknown feature detect\n");"#,
        );

        let err = materialize(Integration::Modernizr.entry(), &fx.ctx(false))
            .await
            .unwrap_err();
        match err {
            MaterializeError::Build { output, .. } => {
                assert_eq!(output, "unknown feature detect")
            }
            other => panic!("expected build error, got {:?}", other),
        }
        assert!(!fx.root().join("scripts/modernizr.js").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_modernizr_nonzero_exit_fails() {
        if !node_available() {
            return;
        }
        let fx = Fixture::new();
        fx.modernizr("process.exit(3);");

        let err = materialize(Integration::Modernizr.entry(), &fx.ctx(false))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exit code 3"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_modernizr_silent_without_output_fails() {
        if !node_available() {
            return;
        }
        let fx = Fixture::new();
        fx.modernizr("// writes nothing");

        let err = materialize(Integration::Modernizr.entry(), &fx.ctx(false))
            .await
            .unwrap_err();
        assert!(matches!(err, MaterializeError::Build { .. }));
        assert!(err.to_string().contains("was not produced"));
    }
}
