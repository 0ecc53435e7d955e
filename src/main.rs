use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pkgorder::export::{self, ExportFormat, Report};
use pkgorder::parser;
use pkgorder::resolver::DependencyResolver;

#[derive(Parser)]
#[command(name = "pkgorder")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Installation ordering for package dependency graphs", long_about = None)]
struct Cli {
    /// Path to the JSON package manifest
    #[arg(
        short,
        long,
        global = true,
        env = "PKGORDER_MANIFEST",
        default_value = "packages.json"
    )]
    manifest: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: ExportFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every known package
    Packages,
    /// Show the installation order for one package
    Order {
        /// Package to install
        package: String,
    },
    /// Show what still needs installing when another package is installed
    ToInstall {
        /// Package to install
        package: String,
        /// Package that is already installed
        installed: String,
    },
    /// Show a valid installation order for every package
    OrderAll,
    /// Show the package with the most transitive dependencies
    MaxDeps,
    /// List dependency cycles; exits non-zero if any exist
    Check,
    /// Print every package with its direct dependents
    Graph,
}

fn init_tracing(verbose: u8) {
    // RUST_LOG takes precedence over -v
    let default_level = match verbose {
        0 => "pkgorder=warn",
        1 => "pkgorder=info",
        2 => "pkgorder=debug",
        _ => "pkgorder=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let packages = parser::load(&cli.manifest)
        .with_context(|| format!("failed to load manifest {}", cli.manifest.display()))?;
    let resolver = DependencyResolver::from_packages(packages);

    let mut exit = ExitCode::SUCCESS;
    let report = match cli.command {
        Commands::Packages => Report::Packages {
            packages: resolver.packages().to_vec(),
        },
        Commands::Order { package } => {
            let order = resolver
                .installation_order(&package)
                .with_context(|| format!("cannot order '{}'", package))?;
            Report::InstallOrder {
                package: Some(package),
                order,
            }
        }
        Commands::ToInstall { package, installed } => {
            let order = resolver
                .to_install(&package, &installed)
                .with_context(|| format!("cannot install '{}' on top of '{}'", package, installed))?;
            Report::ToInstall {
                package,
                installed,
                order,
            }
        }
        Commands::OrderAll => Report::InstallOrder {
            package: None,
            order: resolver
                .installation_order_for_all()
                .context("cannot order all packages")?,
        },
        Commands::MaxDeps => {
            let package = resolver
                .package_with_max_dependencies()
                .context("cannot count dependencies")?;
            let dependencies = match &package {
                Some(name) => resolver.transitive_dependency_count(name)?,
                None => 0,
            };
            Report::MaxDependencies {
                package,
                dependencies,
            }
        }
        Commands::Check => {
            let cycles = resolver.cycles();
            if !cycles.is_empty() {
                exit = ExitCode::FAILURE;
            }
            Report::Cycles { cycles }
        }
        Commands::Graph => Report::graph(resolver.graph()),
    };

    export::export(cli.format, &report, &mut io::stdout().lock())
        .context("failed to write output")?;
    Ok(exit)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!(manifest = %cli.manifest.display(), "starting pkgorder");
    run(cli)
}
