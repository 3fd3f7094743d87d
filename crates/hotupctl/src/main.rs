//! hotupctl - CLI driver for the hot-update lifecycle
//!
//! Runs the same manager an embedding application would, against a
//! local content directory. Useful for exercising update servers and
//! for inspecting or repairing an update state on disk.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hotup_core::{
    CancelToken, CanaryOutcome, CheckOutcome, HttpFetcher, LoggingNotifier, ManagerConfig,
    StageOutcome, StageRequest, UpdateManager, Version, ZipExtractor,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hotupctl")]
#[command(about = "Hot-update lifecycle manager", long_about = None)]
#[command(version)]
struct Cli {
    /// Base directory holding the content roots and update state
    #[arg(long, global = true, default_value = ".hotup")]
    root: PathBuf,

    /// Version baked into the application bundle
    #[arg(long, global = true, default_value = "1.0.0")]
    bundle_version: String,

    /// Bundled content used to seed the active root on first run
    #[arg(long, global = true)]
    bundle_www: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show installed, pending, and ignored versions
    Status {
        /// Emit the raw JSON payload
        #[arg(long)]
        json: bool,
    },

    /// Decide whether an advertised version should be fetched
    Check {
        /// Version advertised by the update server
        version: String,
    },

    /// Download and stage an update package
    Fetch {
        /// URL of the update ZIP
        url: String,

        /// Version the package carries
        version: String,

        /// Expected SHA-256 of the package
        #[arg(long)]
        sha256: Option<String>,
    },

    /// Activate the staged update
    Install,

    /// Report the canary verdict for the active update
    Canary {
        /// Version the verdict applies to
        version: String,

        /// Report failure and roll back
        #[arg(long)]
        fail: bool,
    },

    /// Show the versions installed over time
    History,

    /// Manage the permanently ignored versions
    Ignore {
        #[command(subcommand)]
        command: IgnoreCommands,
    },
}

#[derive(Subcommand)]
enum IgnoreCommands {
    /// List ignored versions
    List,
    /// Add a version to the ignore list
    Add { version: String },
    /// Remove a version from the ignore list
    Remove { version: String },
    /// Clear the ignore list
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let manager = Arc::new(
        UpdateManager::open(
            ManagerConfig {
                base_dir: cli.root.clone(),
                bundle_version: Version::new(&cli.bundle_version),
                bundle_content: cli.bundle_www.clone(),
            },
            Box::new(HttpFetcher::new()),
            Box::new(ZipExtractor::new()),
            Box::new(LoggingNotifier),
        )
        .with_context(|| format!("failed to open update root {}", cli.root.display()))?,
    );

    match cli.command {
        Commands::Status { json } => status(&manager, json),
        Commands::Check { version } => check(&manager, &version),
        Commands::Fetch { url, version, sha256 } => fetch(&manager, url, version, sha256),
        Commands::Install => install(&manager),
        Commands::Canary { version, fail } => canary(&manager, &version, fail),
        Commands::History => history(&manager),
        Commands::Ignore { command } => ignore(&manager, command),
    }
}

fn status(manager: &UpdateManager, json: bool) -> Result<()> {
    let info = manager.version_info();
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Installed:  {}", info.installed_version);
    println!("Bundle:     {}", info.app_bundle_version);
    if let Some(v) = &info.previous_version {
        println!("Previous:   {v}");
    }
    if let Some(v) = &info.pending_version {
        let ready = if info.pending_update_ready {
            "ready to install"
        } else {
            "downloading"
        };
        println!("Pending:    {v} ({ready})");
    }
    if let Some(v) = &info.canary_version {
        println!("Canary:     {v} (awaiting verdict)");
    }
    if !info.ignore_list.is_empty() {
        let list: Vec<&str> = info.ignore_list.iter().map(Version::as_str).collect();
        println!("Ignored:    {}", list.join(", "));
    }
    println!("Active www: {}", manager.active_root().display());
    Ok(())
}

fn check(manager: &UpdateManager, version: &str) -> Result<()> {
    match manager.check_available(&Version::new(version)) {
        CheckOutcome::Available => println!("{version}: update available"),
        CheckOutcome::UpToDate => println!("{version}: already up to date"),
        CheckOutcome::Ignored => println!("{version}: ignored (failed a previous canary)"),
    }
    Ok(())
}

fn fetch(
    manager: &Arc<UpdateManager>,
    url: String,
    version: String,
    sha256: Option<String>,
) -> Result<()> {
    let req = StageRequest {
        url,
        version: Version::new(version),
        sha256,
    };
    let outcome = manager
        .download_and_stage(&req, &CancelToken::new())
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;

    match outcome {
        StageOutcome::Staged => {
            println!("{} staged; run `hotupctl install` to activate", req.version)
        }
        StageOutcome::AlreadyInstalled => println!("{} is already installed", req.version),
        StageOutcome::AlreadyStaged => println!("{} is already staged", req.version),
        StageOutcome::NotNewer => println!("{} is not newer than the installed version", req.version),
        StageOutcome::Ignored => println!("{} is on the ignore list, refusing", req.version),
        StageOutcome::Cancelled => println!("download of {} was cancelled", req.version),
    }
    Ok(())
}

fn install(manager: &UpdateManager) -> Result<()> {
    let version = manager
        .install()
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;
    println!("{version} activated; report the canary verdict with `hotupctl canary {version}`");
    Ok(())
}

fn canary(manager: &UpdateManager, version: &str, fail: bool) -> Result<()> {
    // The manager refuses a verdict that names the wrong activation.
    let outcome = manager
        .canary_for(&Version::new(version), !fail)
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;
    match outcome {
        CanaryOutcome::Committed => println!("{version} confirmed and committed"),
        CanaryOutcome::RolledBack { to } => {
            println!("{version} rolled back to {to} and added to the ignore list")
        }
        CanaryOutcome::NoCanaryPending => println!("no canary pending"),
        CanaryOutcome::RollbackUnavailable => {
            println!("{version} failed but there is nothing to roll back to")
        }
    }
    Ok(())
}

fn history(manager: &UpdateManager) -> Result<()> {
    let versions = manager.version_history();
    if versions.is_empty() {
        println!("no updates installed yet");
        return Ok(());
    }
    for v in versions {
        println!("{v}");
    }
    Ok(())
}

fn ignore(manager: &UpdateManager, command: IgnoreCommands) -> Result<()> {
    match command {
        IgnoreCommands::List => {
            for v in manager.ignored_versions() {
                println!("{v}");
            }
        }
        IgnoreCommands::Add { version } => {
            manager
                .ignore_add(&Version::new(&version))
                .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;
            println!("{version} added to the ignore list");
        }
        IgnoreCommands::Remove { version } => {
            let removed = manager
                .ignore_remove(&Version::new(&version))
                .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;
            if removed {
                println!("{version} removed from the ignore list");
            } else {
                println!("{version} was not on the ignore list");
            }
        }
        IgnoreCommands::Clear => {
            manager
                .ignore_clear()
                .map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;
            println!("ignore list cleared");
        }
    }
    Ok(())
}
