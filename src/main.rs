//! Impactboard - monthly NGO impact reporting portal
//!
//! Organizations submit one report per month; the dashboard totals people
//! helped, events conducted and funds utilized across organizations.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, seed file, bind failure, etc.)
//!   2 - Input rejected (validation error or malformed month)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod portal;
mod report;
mod seed;
mod server;
mod store;
mod validation;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, DashboardArgs, OutputFormat, ServeArgs, SubmitArgs};
use config::{Config, CONFIG_FILE_NAME};
use error::PortalError;
use models::{Month, ReportKey, ReportSubmission, UpsertOutcome};
use portal::ReportPortal;
use std::net::SocketAddr;
use store::DynReportStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const EXIT_REJECTED: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("Impactboard v{}", env!("CARGO_PKG_VERSION"));
    info!("{}", config_source);
    debug!("Arguments: {:?}", args);

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .impactboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change seeding, the bind address, and dashboard output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence over the verbosity flags when set. Logs go
/// to stderr so dashboard output on stdout stays machine-readable.
fn init_logging(args: &Args, config: &Config) {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let result = match EnvFilter::try_from_default_env() {
        Ok(filter) => tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish()),
        Err(_) => tracing::subscriber::set_global_default(
            builder
                .with_max_level(args.log_level(config.general.verbose))
                .finish(),
        ),
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Build the portal and dispatch the subcommand.
async fn run(args: Args, config: Config) -> Result<i32> {
    let store = seed::build_store(&config.store)?;
    let store: DynReportStore = Box::new(store);
    let portal = ReportPortal::new(store);

    match args.command {
        Command::Dashboard(ref dashboard_args) => handle_dashboard(&portal, dashboard_args, &config),
        Command::Submit(ref submit_args) => handle_submit(portal, submit_args),
        Command::Serve(ref serve_args) => handle_serve(portal, serve_args, &config).await,
        Command::InitConfig => Ok(0),
    }
}

/// Render the dashboard for one month.
fn handle_dashboard(
    portal: &ReportPortal<DynReportStore>,
    args: &DashboardArgs,
    config: &Config,
) -> Result<i32> {
    let now = Utc::now();
    let month = match args.month.as_deref() {
        Some(raw) => match validation::parse_month_query(raw) {
            Ok(month) => month,
            Err(e) => {
                eprintln!("❌ {}", e);
                return Ok(EXIT_REJECTED);
            }
        },
        None => Month::containing(now),
    };

    let dashboard = portal.dashboard(&month, now)?;
    let format = args.format.unwrap_or(config.general.format);
    let output = match format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard, &config.dashboard),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            info!("Dashboard for {} saved to {}", month, path.display());
        }
        None => println!("{}", output),
    }

    Ok(0)
}

/// Submit one report and show the refreshed month.
fn handle_submit(mut portal: ReportPortal<DynReportStore>, args: &SubmitArgs) -> Result<i32> {
    let submission = ReportSubmission::from(args);
    let previous = match Month::parse(&args.month) {
        Some(month) => portal.report(&ReportKey::new(args.ngo_id.clone(), month))?,
        None => None,
    };

    let outcome = match portal.submit(&submission) {
        Ok(outcome) => outcome,
        Err(PortalError::Validation(errors)) => {
            eprintln!("❌ Validation error ({} field(s) rejected):", errors.len());
            for field_error in errors.iter() {
                eprintln!("   - {}", field_error);
            }
            return Ok(EXIT_REJECTED);
        }
        Err(e) => return Err(e.into()),
    };

    let report = outcome.report();
    let verb = match outcome {
        UpsertOutcome::Created(_) => "Created",
        UpsertOutcome::Updated(_) => "Updated",
    };
    println!("✅ {} report {} for {}", verb, report.id, report.key());
    if let Some(previous) = previous {
        println!(
            "   Replaced: {} people helped, {} events, {:.2} funds",
            previous.people_helped, previous.events_conducted, previous.funds_utilized
        );
    }

    let summary = portal.summary_for(&report.month)?;
    println!("\n📊 {} totals:", report.month);
    println!("   Organizations: {}", summary.organization_count);
    println!("   People helped: {}", summary.total_people_helped);
    println!("   Events conducted: {}", summary.total_events_conducted);
    println!("   Funds utilized: {:.2}", summary.total_funds_utilized);
    warn!("Reports are held in memory only; this submission is not persisted");

    Ok(0)
}

/// Run the HTTP API.
async fn handle_serve(
    portal: ReportPortal<DynReportStore>,
    args: &ServeArgs,
    config: &Config,
) -> Result<i32> {
    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;

    server::run_server(portal, addr).await?;
    Ok(0)
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is initialized, so it returns a description of
/// where the configuration came from for the caller to log.
fn load_config(args: &Args) -> Result<(Config, String)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, format!("Loaded config from: {}", config_path.display())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, format!("Loaded default config from {}", CONFIG_FILE_NAME))),
        Ok(None) => Ok((Config::default(), "No config file found, using defaults".to_string())),
        Err(e) => Ok((
            Config::default(),
            format!("Failed to load config ({:#}), using defaults", e),
        )),
    }
}
