//! Charm-style CLI prompts using cliclack

use super::{InterruptGuard, SpinnerReporter};
use crate::config::Settings;
use crate::integrations::{
    project_name, resolve, Answers, BuildTool, Integration, IntegrationSet, Library,
    ProjectDescriptor,
};
use crate::product::ProductConfig;
use crate::runtime::{check, PackageManager};
use crate::scaffold::{ConsoleReporter, ProjectBuilder, ScaffoldReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// CLI arguments for the create command
///
/// Every `Some` field skips the matching prompt.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name
    pub name: Option<String>,

    /// Include Bootstrap (and therefore jQuery)
    pub bootstrap: Option<bool>,

    /// Include Barba.js
    pub barbajs: Option<bool>,

    /// Additional libraries
    pub libraries: Option<Vec<Library>>,

    /// Build pipeline flavor
    pub build_tool: Option<BuildTool>,

    /// Directory the project is created in (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Accept defaults for unanswered prompts and replace an existing project
    pub yes: bool,
}

/// CLI arguments for adding a build pipeline to an existing project
#[derive(Debug, Clone, Default)]
pub struct GulpArgs {
    pub name: Option<String>,
    pub build_tool: Option<BuildTool>,
    pub directory: Option<PathBuf>,
}

/// Run the CLI with interactive prompts
///
/// Returns the scaffold report so the caller can pick an exit code; partial
/// integration failures are not an error here.
pub async fn run<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    guard: &InterruptGuard,
) -> Result<ScaffoldReport> {
    cliclack::intro(config.display_name())?;

    let settings = Settings::from_config(config)?;

    // Step 1: Answers
    let answers = collect_answers(config, &args)?;

    // Step 2: Resolve destination and integration set
    let root = destination_root(args.directory.as_deref())?;
    let (project, integrations) = resolve(&answers, &root)?;
    if integrations.is_empty() {
        cliclack::log::info("No integrations selected")?;
    } else {
        cliclack::log::info(format!(
            "Integrations: {}",
            integrations.display_names().join(", ")
        ))?;
    }

    // Step 3: Existing destination
    confirm_destination(project.destination_path(), args.yes)?;

    // Step 4: Node.js / npm
    let npm = PackageManager::from_settings(&settings);
    handle_runtime_check(config, npm.program(), &integrations, args.yes)?;

    // Step 5: Generate
    guard.watch(project.destination_path());
    let spinner = SpinnerReporter::new();
    let result = if spinners_enabled() {
        ProjectBuilder::new(&settings, &npm, &spinner)
            .build(&project, &integrations)
            .await
    } else {
        ProjectBuilder::new(&settings, &npm, &ConsoleReporter)
            .build(&project, &integrations)
            .await
    };
    guard.release();
    let report = result?;

    cliclack::log::success(format!(
        "Created {} files in {}",
        count_files(project.destination_path()),
        project.destination_path().display()
    ))?;

    if !report.is_complete() {
        cliclack::log::warning(report.summary())?;
    }

    // Step 6: Show next steps
    print_next_steps(config, &project, &report.installed_integrations())?;

    Ok(report)
}

/// Add a Gulp build pipeline to a project created earlier
pub async fn run_gulp<C: ProductConfig>(config: &C, args: GulpArgs) -> Result<Vec<PathBuf>> {
    cliclack::intro(format!("{} build pipeline", config.display_name()))?;

    let settings = Settings::from_config(config)?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => prompt_name(config)?,
    };
    let root = destination_root(args.directory.as_deref())?;
    let project = ProjectDescriptor::new(name, &root)?;

    let tool = match args.build_tool {
        Some(BuildTool::None) => anyhow::bail!("A build pipeline flavor is required"),
        Some(tool) => tool,
        None => select_build_tool()?,
    };
    let integrations: IntegrationSet = tool.integrations().iter().copied().collect();

    let npm = PackageManager::from_settings(&settings);
    handle_runtime_check(config, npm.program(), &integrations, false)?;

    let spinner = SpinnerReporter::new();
    let files = if spinners_enabled() {
        ProjectBuilder::new(&settings, &npm, &spinner)
            .add_build_pipeline(&project, &integrations)
            .await?
    } else {
        ProjectBuilder::new(&settings, &npm, &ConsoleReporter)
            .add_build_pipeline(&project, &integrations)
            .await?
    };

    cliclack::outro(format!(
        "{} pipeline ready in {}. Run `npm start` there to serve it.",
        tool.display_name(),
        project.destination_path().display()
    ))?;

    Ok(files)
}

fn collect_answers<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<Answers> {
    let name = match &args.name {
        Some(name) => Some(name.clone()),
        None if args.yes => None,
        None => Some(prompt_name(config)?),
    };

    let bootstrap = match args.bootstrap {
        Some(value) => value,
        None if args.yes => false,
        None => cliclack::confirm("Include Bootstrap?")
            .initial_value(false)
            .interact()?,
    };

    let barbajs = match args.barbajs {
        Some(value) => value,
        None if args.yes => false,
        None => cliclack::confirm("Include Barba.js page transitions?")
            .initial_value(false)
            .interact()?,
    };

    let libraries = match &args.libraries {
        Some(libraries) => libraries.clone(),
        None if args.yes => Vec::new(),
        None => select_libraries(bootstrap)?,
    };

    let build_tool = match args.build_tool {
        Some(tool) => tool,
        None if args.yes => BuildTool::None,
        None => {
            let wanted: bool = cliclack::confirm("Set up a Gulp build pipeline?")
                .initial_value(false)
                .interact()?;
            if wanted {
                select_build_tool()?
            } else {
                BuildTool::None
            }
        }
    };

    Ok(Answers {
        name,
        bootstrap,
        barbajs,
        build_tool,
        libraries,
    })
}

fn prompt_name<C: ProductConfig>(config: &C) -> Result<String> {
    let default = config.default_project_name();
    let input: String = cliclack::input("Project name")
        .placeholder(default)
        .default_input(default)
        .validate(|input: &String| project_name(Some(input)).map(|_| ()).map_err(|e| e.to_string()))
        .interact()?;
    Ok(input)
}

fn select_libraries(bootstrap: bool) -> Result<Vec<Library>> {
    let mut multi = cliclack::multiselect("Additional libraries (optional)");
    for library in Library::ALL {
        let hint = match library {
            Library::Jquery if bootstrap => "included with Bootstrap",
            Library::Modernizr => "full feature-detect build",
            _ => "",
        };
        multi = multi.item(library, library.to_string(), hint);
    }

    let selected: Vec<Library> = multi.required(false).interact()?;
    Ok(selected)
}

fn select_build_tool() -> Result<BuildTool> {
    let tool: BuildTool = cliclack::select("Pipeline flavor")
        .item(BuildTool::Plain, BuildTool::Plain.display_name(), "CSS and JS")
        .item(BuildTool::Sass, BuildTool::Sass.display_name(), "SCSS styles")
        .item(BuildTool::Babel, BuildTool::Babel.display_name(), "ES2015+ scripts")
        .interact()?;
    Ok(tool)
}

fn destination_root(directory: Option<&Path>) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to read current directory")?;

    let root = match directory {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current_dir.join(dir),
        None => return Ok(current_dir),
    };

    if !root.is_dir() {
        anyhow::bail!("Directory does not exist: {}", root.display());
    }
    cliclack::log::info(format!("Using directory: {}", root.display()))?;

    Ok(root)
}

fn confirm_destination(path: &Path, yes: bool) -> Result<()> {
    if path.is_file() {
        cliclack::log::warning(format!("{} exists and is a file", path.display()))?;
    } else if path.is_dir() {
        let count = std::fs::read_dir(path).map(|e| e.count()).unwrap_or(0);
        if count == 0 {
            return Ok(());
        }
        cliclack::log::warning(format!(
            "{} already has {} items; they will be removed",
            path.display(),
            count
        ))?;
    } else {
        return Ok(());
    }

    let confirm = if yes {
        true
    } else {
        cliclack::confirm("Replace it?")
            .initial_value(false)
            .interact()?
    };

    if !confirm {
        anyhow::bail!("Setup cancelled.");
    }

    Ok(())
}

fn handle_runtime_check<C: ProductConfig>(
    config: &C,
    package_manager: &str,
    integrations: &IntegrationSet,
    yes: bool,
) -> Result<()> {
    if !check::RuntimeNeeds::for_integrations(integrations).any() {
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start("Checking runtimes...");

    let error = match check::check_runtimes(integrations, package_manager) {
        Ok(runtimes) => {
            let runtime_info: Vec<String> = runtimes
                .iter()
                .map(|r| format!("{} ({})", r.name, r.version.as_deref().unwrap_or("unknown")))
                .collect();
            spinner.stop(format!("Detected runtimes: {}", runtime_info.join(", ")));
            return Ok(());
        }
        Err(e) => e,
    };

    spinner.error("Missing runtimes");
    cliclack::log::error(format!("{}", error))?;

    if yes {
        anyhow::bail!("Please install the missing runtimes and try again.");
    }

    let action: &str = cliclack::select("What would you like to do?")
        .item(
            "docs",
            format!("Open documentation ({})", config.runtime_docs_url()),
            "",
        )
        .item("cancel", "Cancel", "")
        .interact()?;

    if action == "docs" {
        open::that(config.runtime_docs_url())
            .with_context(|| format!("Failed to open {}", config.runtime_docs_url()))?;
        cliclack::outro("After installing Node.js, run this command again.")?;
    }

    anyhow::bail!("Setup cancelled.");
}

/// Spinners redraw in place; logs and pipes get plain lines instead
fn spinners_enabled() -> bool {
    console::Term::stderr().is_term()
}

fn count_files(root: &Path) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project: &ProjectDescriptor,
    installed: &IntegrationSet,
) -> Result<()> {
    let steps = config.next_steps(project, installed);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    let closing = if installed.contains(Integration::Gulp) {
        "Happy building!"
    } else {
        "Happy coding!"
    };
    cliclack::outro(closing)?;

    Ok(())
}
