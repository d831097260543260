//! HTML5 Webapp CLI - Project scaffolding for static front-end webapps

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use webapp_core::tui::{CreateArgs, GulpArgs, InterruptGuard};
use webapp_core::{BuildTool, Integration, IntegrationSet, Library, ProductConfig, ProjectDescriptor};

/// Exit code when the project was generated but some integrations failed
const PARTIAL_EXIT_CODE: u8 = 2;

/// HTML5 Webapp product configuration
#[derive(Clone)]
pub struct Html5WebappConfig;

impl ProductConfig for Html5WebappConfig {
    fn display_name(&self) -> &'static str {
        "HTML5 Webapp"
    }

    fn package_manager_env(&self) -> &'static str {
        "HTML5_WEBAPP_NPM"
    }

    fn install_timeout_env(&self) -> &'static str {
        "HTML5_WEBAPP_INSTALL_TIMEOUT"
    }

    fn template_env(&self) -> &'static str {
        "HTML5_WEBAPP_TEMPLATE"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding HTML5 webapps with Bootstrap, jQuery, Barba.js and a Gulp pipeline"
    }

    fn next_steps(&self, project: &ProjectDescriptor, integrations: &IntegrationSet) -> Vec<String> {
        let mut steps = Vec::new();
        let dir = project.destination_path();

        // Step 1: cd to directory if not current
        let current = std::env::current_dir().ok();
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", display_relative(dir, current.as_deref())));
        }

        // Step 2: Edit sources
        if integrations.uses_sass() {
            steps.push("Edit scripts/main.js and styles/main.scss".to_string());
        } else {
            steps.push("Edit scripts/main.js and styles/main.css".to_string());
        }

        // Step 3: Serve
        if integrations.contains(Integration::Gulp) {
            steps.push("npm start".to_string());
        } else {
            steps.push("Open index.html in your browser".to_string());
        }

        steps
    }
}

fn display_relative(dir: &Path, current: Option<&Path>) -> String {
    current
        .and_then(|c| dir.strip_prefix(c).ok())
        .unwrap_or(dir)
        .display()
        .to_string()
}

#[derive(Parser, Debug)]
#[command(name = "create-html5-webapp")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub create: CliCreateArgs,
}

/// Command-line definition with the product's description as its about text
fn cli(config: &Html5WebappConfig) -> clap::Command {
    Args::command().about(config.cli_description())
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a Gulp build pipeline to an existing project
    Gulp(CliGulpArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Project name
    pub name: Option<String>,

    /// Include Bootstrap (adds jQuery)
    #[arg(long, overrides_with = "no_bootstrap")]
    pub bootstrap: bool,

    /// Leave Bootstrap out
    #[arg(long, overrides_with = "bootstrap")]
    pub no_bootstrap: bool,

    /// Include Barba.js
    #[arg(long, overrides_with = "no_barbajs")]
    pub barbajs: bool,

    /// Leave Barba.js out
    #[arg(long, overrides_with = "barbajs")]
    pub no_barbajs: bool,

    /// Additional libraries (comma-separated: jquery,modernizr,slick-carousel)
    #[arg(short, long, value_delimiter = ',', value_enum)]
    pub libraries: Option<Vec<Library>>,

    /// Build pipeline flavor
    #[arg(short, long, value_enum)]
    pub gulp: Option<BuildTool>,

    /// Directory the project is created in
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            bootstrap: flag(args.bootstrap, args.no_bootstrap),
            barbajs: flag(args.barbajs, args.no_barbajs),
            libraries: args.libraries,
            build_tool: args.gulp,
            directory: args.directory,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliGulpArgs {
    /// Name of the existing project
    pub name: Option<String>,

    /// Build pipeline flavor
    #[arg(short, long, value_enum)]
    pub gulp: Option<BuildTool>,

    /// Directory containing the project
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

impl From<CliGulpArgs> for GulpArgs {
    fn from(args: CliGulpArgs) -> Self {
        GulpArgs {
            name: args.name,
            build_tool: args.gulp,
            directory: args.directory,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Ctrl+C restores the cursor and removes a half-generated project
    let guard = InterruptGuard::install();

    let config = Html5WebappConfig;
    let args = Args::from_arg_matches(&cli(&config).get_matches()).unwrap_or_else(|e| e.exit());

    let result = match args.command {
        Some(Command::Gulp(gulp_args)) => webapp_core::tui::run_gulp(&config, gulp_args.into())
            .await
            .map(|_| ExitCode::SUCCESS),
        None => webapp_core::run(&config, args.create.into(), &guard)
            .await
            .map(|report| {
                if report.is_complete() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(PARTIAL_EXIT_CODE)
                }
            }),
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
