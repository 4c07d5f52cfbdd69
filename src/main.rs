//! order-tracker: watch vehicle orders and get told when they change.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use order_tracker::{
    cli::{self, HistoryView, NotificationAction, WatchOptions},
    config::{AppConfig, OutputFormat},
    notify::PermissionState,
    pipeline::Credential,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "order-tracker")]
#[command(version)]
#[command(about = "Detect and record changes to vehicle orders", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success (no changes, or --fail-on-change not given)
    1  Changes detected with --fail-on-change
    3  Error occurred

EXAMPLES:
    # Check an exported order list once
    order-tracker refresh --orders-file orders.json

    # Poll the API every five minutes
    ORDER_TRACKER_TOKEN=... order-tracker watch --url https://example.com/api/orders -i 5m

    # Show what changed for one order
    order-tracker history RN123456789")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for histories and preferences
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short = 'O', long, global = true)]
    output_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where orders come from; overrides the config file.
#[derive(Parser)]
struct SourceArgs {
    /// Read orders from a JSON file
    #[arg(long, conflicts_with = "url")]
    orders_file: Option<PathBuf>,

    /// Fetch orders from this URL
    #[arg(long)]
    url: Option<String>,

    /// Bearer token for the order API
    #[arg(long, env = "ORDER_TRACKER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Dotted path to ignore when comparing (repeatable)
    #[arg(long = "ignore", value_name = "PATH")]
    ignore_paths: Vec<String>,
}

impl SourceArgs {
    fn credential(&self) -> Credential {
        self.token
            .as_ref()
            .map_or_else(Credential::anonymous, Credential::bearer)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch orders once and report what changed
    Refresh {
        #[command(flatten)]
        source: SourceArgs,

        /// Exit with code 1 when any order changed
        #[arg(long)]
        fail_on_change: bool,
    },

    /// Refresh on an interval until interrupted
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        /// Refresh interval (e.g. 30s, 5m, 1h)
        #[arg(short, long, default_value = "5m")]
        interval: String,

        /// Exit after the first detected change
        #[arg(long)]
        exit_on_change: bool,

        /// Stop after this many refreshes
        #[arg(long)]
        max_cycles: Option<u64>,
    },

    /// List tracked orders or show one order's history
    History {
        /// Reference number; omit to list tracked orders
        reference_number: Option<String>,

        /// Show delivery window and odometer timelines instead of changes
        #[arg(long, conflicts_with = "clear")]
        analytics: bool,

        /// Delete the stored history for this order
        #[arg(long, requires = "reference_number")]
        clear: bool,
    },

    /// Manage system notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum NotificationCommand {
    /// Show whether notifications are active
    Status,
    /// Turn notifications on or off
    Toggle,
    /// Send a test notification
    Test,
    /// Allow notifications on this host
    Allow,
    /// Block notifications on this host
    Block,
    /// Forget the permission decision
    Reset,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Write an example config file
    Init {
        /// Target path (defaults to the user config directory)
        path: Option<PathBuf>,
    },
}

/// Apply global and source flags on top of the file config.
fn effective_config(cli: &Cli, source: Option<&SourceArgs>) -> Result<AppConfig> {
    let overrides = AppConfig::builder()
        .data_dir(cli.data_dir.clone())
        .output_format(cli.format.unwrap_or_default())
        .output_file(cli.output_file.clone())
        .quiet(cli.quiet)
        .orders_file(source.and_then(|s| s.orders_file.clone()))
        .url(source.and_then(|s| s.url.clone()))
        .ignore_paths(source.map(|s| s.ignore_paths.clone()).unwrap_or_default())
        .build();
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    order_tracker::Validatable::ensure_valid(&config)?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Exit code 1 is reserved for `--fail-on-change`.
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:?}");
        std::process::exit(cli::exit_codes::ERROR);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Refresh {
            source,
            fail_on_change,
        } => {
            let config = effective_config(cli, Some(source))?;
            let code = cli::run_refresh(&config, &source.credential(), *fail_on_change)?;
            if code != cli::exit_codes::SUCCESS {
                std::process::exit(code);
            }
            Ok(())
        }

        Commands::Watch {
            source,
            interval,
            exit_on_change,
            max_cycles,
        } => {
            let config = effective_config(cli, Some(source))?;
            let options = WatchOptions {
                interval: cli::parse_duration(interval)?,
                exit_on_change: *exit_on_change,
                max_cycles: *max_cycles,
            };
            cli::run_watch(&config, &source.credential(), &options)
        }

        Commands::History {
            reference_number,
            analytics,
            clear,
        } => {
            let config = effective_config(cli, None)?;
            let view = if *clear {
                HistoryView::Clear
            } else if *analytics {
                HistoryView::Analytics
            } else {
                HistoryView::Changelog
            };
            cli::run_history(&config, reference_number.as_deref(), view)
        }

        Commands::Notifications { action } => {
            let config = effective_config(cli, None)?;
            let action = match action {
                NotificationCommand::Status => NotificationAction::Status,
                NotificationCommand::Toggle => NotificationAction::Toggle,
                NotificationCommand::Test => NotificationAction::Test,
                NotificationCommand::Allow => NotificationAction::Permission(PermissionState::Granted),
                NotificationCommand::Block => NotificationAction::Permission(PermissionState::Denied),
                NotificationCommand::Reset => NotificationAction::Permission(PermissionState::Default),
            };
            cli::run_notifications(&config, action)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "order-tracker", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = order_tracker::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    order_tracker::config::load_or_default(cli.config.as_deref());
                match &loaded_from {
                    Some(path) => eprintln!("# Loaded from: {}", path.display()),
                    None => eprintln!("# No config file found; showing defaults"),
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths = [
                    std::env::current_dir().ok(),
                    dirs::config_dir().map(|p| p.join("order-tracker")),
                    dirs::home_dir(),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {}", path.display());
                }
                eprintln!();
                match order_tracker::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init { path } => {
                let target = path
                    .clone()
                    .unwrap_or_else(order_tracker::config::default_config_path);
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                if let Some(parent) = target.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                }
                std::fs::write(&target, order_tracker::config::generate_full_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
