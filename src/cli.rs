//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Impactboard - monthly NGO impact reporting
///
/// Organizations submit one report per month (people helped, events
/// conducted, funds utilized); the dashboard totals them across
/// organizations for a selected month.
///
/// Examples:
///   impactboard dashboard --month 2023-10
///   impactboard submit --ngo-id NGO001 --month 2023-10 --people-helped 300 \
///       --events-conducted 6 --funds-utilized 60000
///   impactboard --seed reports.json serve --bind 0.0.0.0:3000
///   impactboard init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .impactboard.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "IMPACTBOARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON file of reports to seed the store with
    #[arg(long, value_name = "FILE", global = true)]
    pub seed: Option<PathBuf>,

    /// Start with an empty store instead of the bundled sample reports
    #[arg(long, global = true)]
    pub no_sample_data: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the aggregated dashboard for a month
    Dashboard(DashboardArgs),

    /// Submit (or overwrite) one organization's monthly report
    Submit(SubmitArgs),

    /// Serve the report and dashboard HTTP API
    Serve(ServeArgs),

    /// Generate a default .impactboard.toml configuration file
    InitConfig,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Month to aggregate (YYYY-MM). Defaults to the current month.
    #[arg(short, long, value_name = "YYYY-MM")]
    pub month: Option<String>,

    /// Output format (markdown, json). Defaults to the config setting.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the dashboard to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Organization identifier
    #[arg(long, value_name = "ID")]
    pub ngo_id: String,

    /// Reporting month (YYYY-MM)
    #[arg(short, long, value_name = "YYYY-MM")]
    pub month: String,

    /// Number of people helped
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub people_helped: f64,

    /// Number of events conducted
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub events_conducted: f64,

    /// Funds utilized
    #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
    pub funds_utilized: f64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on. Defaults to the config setting.
    #[arg(short, long, value_name = "ADDR", env = "IMPACTBOARD_BIND")]
    pub bind: Option<String>,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref seed) = self.seed {
            if !seed.is_file() {
                return Err(format!("Seed file does not exist: {}", seed.display()));
            }
        }

        if let Command::Serve(ServeArgs { bind: Some(ref bind) }) = self.command {
            if bind.parse::<std::net::SocketAddr>().is_err() {
                return Err(format!("Invalid bind address: {}", bind));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins over a config file that enables verbose logging.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

impl From<&SubmitArgs> for crate::models::ReportSubmission {
    fn from(args: &SubmitArgs) -> Self {
        Self {
            ngo_id: Some(Value::from(args.ngo_id.as_str())),
            month: Some(Value::from(args.month.as_str())),
            people_helped: Some(Value::from(args.people_helped)),
            events_conducted: Some(Value::from(args.events_conducted)),
            funds_utilized: Some(Value::from(args.funds_utilized)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            config: None,
            verbose: false,
            quiet: false,
            seed: None,
            no_sample_data: false,
            command,
        }
    }

    #[test]
    fn test_parse_submit() {
        let args = Args::try_parse_from([
            "impactboard",
            "submit",
            "--ngo-id",
            "NGO001",
            "--month",
            "2023-10",
            "--people-helped",
            "300",
            "--events-conducted",
            "6",
            "--funds-utilized",
            "60000",
        ])
        .unwrap();

        match args.command {
            Command::Submit(ref submit) => {
                assert_eq!(submit.ngo_id, "NGO001");
                assert_eq!(submit.people_helped, 300.0);
                let submission = crate::models::ReportSubmission::from(submit);
                assert_eq!(submission.funds_utilized, Some(Value::from(60000.0)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_dashboard_with_global_flags() {
        let args =
            Args::try_parse_from(["impactboard", "dashboard", "-m", "2023-11", "--format", "json", "-v"])
                .unwrap();

        assert!(args.verbose);
        match args.command {
            Command::Dashboard(ref dashboard) => {
                assert_eq!(dashboard.month.as_deref(), Some("2023-11"));
                assert_eq!(dashboard.format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_metrics_reach_validation() {
        let args = Args::try_parse_from([
            "impactboard",
            "submit",
            "--ngo-id",
            "NGO001",
            "--month",
            "2023-10",
            "--people-helped",
            "-5",
            "--events-conducted",
            "1",
            "--funds-utilized",
            "1",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::Submit(ref s) if s.people_helped == -5.0));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::InitConfig);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_bind_address() {
        let args = make_args(Command::Serve(ServeArgs {
            bind: Some("not-an-address".to_string()),
        }));
        assert!(args.validate().is_err());

        let args = make_args(Command::Serve(ServeArgs {
            bind: Some("127.0.0.1:8080".to_string()),
        }));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_seed() {
        let mut args = make_args(Command::InitConfig);
        args.seed = Some(PathBuf::from("/nonexistent/seed.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::InitConfig);
        assert_eq!(args.log_level(false), tracing::Level::INFO);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
