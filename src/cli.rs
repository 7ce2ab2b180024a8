use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::mover::CollisionPolicy;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "smart-tasks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive task automation: move images, extract emails, scrape page titles")]
#[command(
    long_about = "Smart Tasks opens an interactive menu offering three tasks: moving all files \
                  of one extension between folders, collecting unique email addresses from a \
                  text file, and saving a web page's title. Every task run is recorded in an \
                  append-only activity log."
)]
#[command(after_help = "EXAMPLES:\n  \
    smart-tasks\n  \
    smart-tasks --extension png --on-collision skip\n  \
    smart-tasks --log-file activity.log --timeout 5\n  \
    smart-tasks --generate-config --config smart-tasks.toml")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Activity log file
    #[arg(long, env = "SMART_TASKS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// File extension moved by the "move files" task
    #[arg(short, long, help = "Extension to move (e.g. jpg, .png)")]
    pub extension: Option<String>,

    /// What to do when a moved file already exists in the destination
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// HTTP timeout for title scraping
    #[arg(long, help = "Timeout for fetching a web page (seconds)")]
    pub timeout: Option<u64>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Write a sample configuration file and exit")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_log_file(self.log_file.clone())
            .with_extension(self.extension.clone())
            .with_on_collision(self.on_collision)
            .with_timeout(self.timeout)
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default diagnostic filter when `RUST_LOG` is unset.
    pub fn tracing_filter(&self) -> &'static str {
        if self.quiet {
            return "off";
        }

        match self.verbose {
            0 => "smart_tasks=warn",
            1 => "smart_tasks=info",
            _ => "smart_tasks=debug",
        }
    }
}
