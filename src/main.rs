//! tasksync - repository task scanner
//!
//! Scans a repository for tagged comments, diffs them against the recorded
//! task set, and records the changes a reviewer accepts.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

mod output;
mod progress;

use tasksync::approval::{apply_approved, count_accepted, ApprovalPolicy};
use tasksync::config::{ConfigValidator, ScanConfig, PROJECT_TOML};
use tasksync::diff::{DiffResult, DiffSummary, DiffType};
use tasksync::repository::{LocalRepository, RepositorySource};
use tasksync::scan::{ScanOptions, ScanOutcome, Scanner, DEFAULT_CONCURRENCY};
use tasksync::store::{SnapshotStore, TaskSnapshot};
use tasksync::{ParsedTask, TaskSyncError};

#[derive(Parser)]
#[command(name = "tasksync")]
#[command(version = "0.1.0")]
#[command(about = "Track TODO/FIXME comments as tasks and review what changed between scans", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Directory holding the user-level config.toml
    #[arg(long, global = true, env = "TASKSYNC_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct ScanArgs {
    /// Abort the scan after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Number of files parsed concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tasks found in the project
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Compare a fresh scan with the recorded tasks
    Diff {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Scan, apply accepted changes and record the result
    Sync {
        #[command(flatten)]
        scan: ScanArgs,

        /// Accept every change
        #[arg(long, conflicts_with = "accept")]
        accept_all: bool,

        /// Accept changes of these types
        #[arg(long, value_enum, value_delimiter = ',', ignore_case = true, value_name = "TYPE")]
        accept: Vec<DiffType>,

        /// Show what would be recorded without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Show or validate the scan configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Write a default .tasksync.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,
    /// Check the configuration for errors
    Validate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "tasksync=debug,info"
    } else {
        "tasksync=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        let code = e
            .downcast_ref::<TaskSyncError>()
            .map_or(1, TaskSyncError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Resolve project path
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    if !project_path.exists() {
        anyhow::bail!(
            "Project directory does not exist: {}",
            project_path.display()
        );
    }

    let user_config = match &cli.config_dir {
        Some(dir) => Some(ScanConfig::user_config_in(dir)),
        None => ScanConfig::user_config_path(),
    };
    let load_config = || ScanConfig::load_with(&project_path, user_config.as_deref());

    match cli.command {
        Commands::Scan { scan } => {
            let (outcome, _) = scan_project(&project_path, load_config()?, &scan, None).await?;

            if scan.json {
                println!("{}", serde_json::to_string_pretty(&outcome.tasks)?);
            } else {
                output::print_tasks(&outcome.tasks);
                output::print_scan_stats(&outcome);
            }
        }

        Commands::Diff { scan } => {
            let config = load_config()?;
            let store = SnapshotStore::new(ScanConfig::state_dir(&project_path));
            let previous = store.load()?;

            let (_, results) =
                scan_project(&project_path, config, &scan, Some(previous.tasks.as_slice())).await?;

            if scan.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                output::print_diff(&results);
                println!();
                println!(
                    "{} {}",
                    "Summary:".cyan().bold(),
                    DiffSummary::from_results(&results)
                );
            }
        }

        Commands::Sync {
            scan,
            accept_all,
            accept,
            dry_run,
        } => {
            let config = load_config()?;
            let store = SnapshotStore::new(ScanConfig::state_dir(&project_path));
            let previous = store.load()?;

            let (_, results) =
                scan_project(&project_path, config, &scan, Some(previous.tasks.as_slice())).await?;

            let policy = if accept_all {
                ApprovalPolicy::AcceptAll
            } else if accept.is_empty() {
                ApprovalPolicy::accept_types([DiffType::Same])
            } else {
                ApprovalPolicy::accept_types(accept)
            };

            let accepted = count_accepted(&results, &policy);
            let next = TaskSnapshot::new(apply_approved(&previous.tasks, &results, &policy));

            if !dry_run {
                store.save(&next)?;
            }

            if scan.json {
                let report = serde_json::json!({
                    "summary": DiffSummary::from_results(&results),
                    "accepted": accepted,
                    "rejected": results.len() - accepted,
                    "recorded": next.tasks.len(),
                    "fingerprint": next.fingerprint,
                    "saved": !dry_run,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_diff(&results);
                println!();
                println!(
                    "{} {}",
                    "Summary:".cyan().bold(),
                    DiffSummary::from_results(&results)
                );
                println!(
                    "   Accepted {} of {} change(s)",
                    accepted,
                    results.len()
                );
                if dry_run {
                    println!(
                        "   {} would record {} task(s)",
                        "Dry run:".yellow(),
                        next.tasks.len()
                    );
                } else {
                    println!(
                        "   {} Recorded {} task(s) in {}",
                        "✓".green(),
                        next.tasks.len(),
                        store.snapshot_path().display()
                    );
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_config()?;
                match ScanConfig::locate_with(&project_path, user_config.as_deref()) {
                    Some(path) => eprintln!("{} {}", "Source:".cyan().bold(), path.display()),
                    None => eprintln!("{} built-in defaults", "Source:".cyan().bold()),
                }
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Validate => {
                let config = load_config()?;
                let report = ConfigValidator::new(&config).validate();

                for error in &report.errors {
                    println!("   {} {}", "✗".red(), error);
                }
                for warning in &report.warnings {
                    println!("   {} {}", "!".yellow(), warning);
                }

                if report.is_valid() {
                    println!("{} {}", "✓".green().bold(), report.summary());
                } else {
                    println!("{} {}", "✗".red().bold(), report.summary());
                    std::process::exit(report.exit_code());
                }
            }
        },

        Commands::Init { force } => {
            init_config(&project_path, force)?;
        }
    }

    Ok(())
}

/// Run a scan of the project with progress on stderr, diffing against
/// `previous` when given.
async fn scan_project(
    project: &Path,
    config: ScanConfig,
    args: &ScanArgs,
    previous: Option<&[ParsedTask]>,
) -> anyhow::Result<(ScanOutcome, Vec<DiffResult>)> {
    let mut options = ScanOptions::new().with_concurrency(args.concurrency);
    if let Some(secs) = args.timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = progress::spawn(rx, !args.json);

    let scanner = Scanner::new(config).with_options(options).with_events(tx);
    let source: Arc<dyn RepositorySource> = Arc::new(LocalRepository::new(project));
    let result = match previous {
        Some(previous) => scanner.scan_and_diff(source, previous).await,
        None => scanner.scan(source).await.map(|outcome| (outcome, Vec::new())),
    };

    // Dropping the scanner closes the event channel so the progress task ends.
    drop(scanner);
    let _ = progress.await;

    Ok(result?)
}

fn init_config(project: &Path, force: bool) -> anyhow::Result<()> {
    let path = project.join(PROJECT_TOML);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::write(&path, ScanConfig::default().to_toml()?)?;
    println!("{} Wrote {}", "✓".green().bold(), path.display());
    Ok(())
}
