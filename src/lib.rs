pub mod activity;
pub mod cli;
pub mod config;
pub mod emails;
pub mod error;
pub mod menu;
pub mod mover;
pub mod scraper;
pub mod ui;

// Public API re-exports
pub use activity::{FileLogSink, LogEntry, LogSink, MemoryLogSink};
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, EmailConfig, LogConfig, MoverConfig, ScraperConfig};
pub use error::{Result, TaskError, UserFriendlyError};

// Core functionality re-exports
pub use emails::{EmailExtractor, EmailReport};
pub use menu::{Dispatcher, MenuChoice, MenuState, TaskChoice};
pub use mover::{CollisionPolicy, FileMover, MoveBatch, MoveProgress, MoveReport};
pub use scraper::{HttpFetcher, PageFetcher, ScrapedTitle, TitleScraper};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A user-invokable operation with its inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    MoveFiles { source: PathBuf, destination: PathBuf },
    ExtractEmails { input: PathBuf, output: PathBuf },
    ScrapeTitle { url: String },
}

/// Successful result of a [`Task`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "task", content = "result")]
pub enum TaskOutcome {
    #[serde(rename = "move_files")]
    Moved(MoveReport),
    #[serde(rename = "extract_emails")]
    Extracted(EmailReport),
    #[serde(rename = "scrape_title")]
    Scraped(ScrapedTitle),
}

impl TaskOutcome {
    /// The activity-log line for this outcome.
    pub fn log_message(&self) -> String {
        match self {
            TaskOutcome::Moved(report) => {
                format!("Moved {} {} files", report.moved, report.extension_label())
            }
            TaskOutcome::Extracted(report) => format!("Extracted {} emails", report.count),
            TaskOutcome::Scraped(scraped) => format!("Scraped website title: {}", scraped.title),
        }
    }
}

/// Main library interface: owns configuration and the task components.
pub struct SmartTasks {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    mover: FileMover,
    extractor: EmailExtractor,
    scraper: TitleScraper,
}

impl SmartTasks {
    /// Create an instance that fetches pages over HTTP.
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            config.scraper_timeout_duration(),
            &config.scraper.user_agent,
        )?;

        Self::with_fetcher(config, Box::new(fetcher), output_mode, verbose, quiet)
    }

    /// Create an instance with a custom page source for the title scraper.
    pub fn with_fetcher(
        config: Config,
        fetcher: Box<dyn PageFetcher>,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Result<Self> {
        config.validate()?;

        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_mode == OutputMode::Human && !quiet);

        let mover = FileMover::new()
            .with_extension(&config.mover.extension)
            .with_collision_policy(config.mover.on_collision);
        let extractor = EmailExtractor::new()?;
        let scraper = TitleScraper::new(fetcher)?.with_output_file(&config.scraper.output_file);

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            mover,
            extractor,
            scraper,
        })
    }

    /// Create instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
    }

    pub fn run_task(&self, task: &Task) -> Result<TaskOutcome> {
        match task {
            Task::MoveFiles {
                source,
                destination,
            } => self.move_files(source, destination).map(TaskOutcome::Moved),
            Task::ExtractEmails { input, output } => {
                self.extract_emails(input, output).map(TaskOutcome::Extracted)
            }
            Task::ScrapeTitle { url } => self.scrape_title(url).map(TaskOutcome::Scraped),
        }
    }

    /// Move every file with the configured extension, with a progress bar.
    pub fn move_files(&self, source: &Path, destination: &Path) -> Result<MoveReport> {
        let file_progress = self.progress_manager.create_file_progress(0);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &MoveProgress| {
                pb.set_length(progress.total_files as u64);
                ui::progress::update_move_progress(&pb, progress);
            }
        };

        let result = self
            .mover
            .move_by_extension(source, destination, Some(&progress_callback));

        match result {
            Ok(report) => {
                ui::progress::finish_progress_with_summary(
                    &file_progress,
                    &format!("Moved {} files", report.moved),
                    file_progress.elapsed(),
                );
                Ok(report)
            }
            Err(e) => {
                file_progress.abandon();
                Err(e)
            }
        }
    }

    pub fn extract_emails(&self, input: &Path, output: &Path) -> Result<EmailReport> {
        self.extractor.extract(input, output)
    }

    /// Fetch `url` and store its title, with a spinner while waiting.
    pub fn scrape_title(&self, url: &str) -> Result<ScrapedTitle> {
        let spinner = self
            .progress_manager
            .create_spinner(&format!("Fetching {}", url.trim()));
        let result = self.scraper.scrape_title(url);
        spinner.finish_and_clear();
        result
    }

    /// The activity-log line for a failed task.
    pub fn failure_message(&self, task: &Task, error: &TaskError) -> String {
        match task {
            Task::MoveFiles { .. } => format!(
                "Error moving {} files: {}",
                self.mover.extension().to_uppercase(),
                error
            ),
            Task::ExtractEmails { .. } => format!("Email extraction error: {}", error),
            Task::ScrapeTitle { .. } => format!("Web scraping error: {}", error),
        }
    }

    /// The append-only activity log configured for this instance.
    pub fn log_sink(&self) -> FileLogSink {
        FileLogSink::new(&self.config.log.file)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use url::Url;

    struct FixedPage(&'static str);

    impl PageFetcher for FixedPage {
        fn fetch(&self, _url: &Url) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn app_in(dir: &TempDir, page: &'static str) -> SmartTasks {
        let mut config = Config::default();
        config.log.file = dir.path().join("logs.txt");
        config.scraper.output_file = dir.path().join("website_title.txt");
        SmartTasks::with_fetcher(config, Box::new(FixedPage(page)), OutputMode::Plain, 0, true)
            .unwrap()
    }

    #[test]
    fn test_creation_with_defaults() {
        let app = SmartTasks::new(Config::default(), OutputMode::Plain, 0, true);
        assert!(app.is_ok());

        let app = app.unwrap();
        assert!(!app.progress_manager().is_enabled());
        assert_eq!(app.config().mover.extension, "jpg");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.scraper.timeout = 0;
        let result = SmartTasks::new(config, OutputMode::Plain, 0, true);
        assert!(matches!(result, Err(TaskError::Config { .. })));
    }

    #[test]
    fn test_run_move_task() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("camera");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.jpg"), "a").unwrap();
        fs::write(source.join("b.txt"), "b").unwrap();

        let app = app_in(&dir, "");
        let task = Task::MoveFiles {
            source: source.clone(),
            destination: dir.path().join("photos"),
        };
        let outcome = app.run_task(&task).unwrap();

        assert_eq!(outcome.log_message(), "Moved 1 JPG files");
        assert!(dir.path().join("photos").join("a.jpg").exists());
        assert!(source.join("b.txt").exists());
    }

    #[test]
    fn test_run_extract_task() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "b@x.com a@x.com a@x.com").unwrap();

        let app = app_in(&dir, "");
        let outcome = app
            .run_task(&Task::ExtractEmails {
                input,
                output: output.clone(),
            })
            .unwrap();

        assert_eq!(outcome.log_message(), "Extracted 2 emails");
        assert_eq!(fs::read_to_string(output).unwrap(), "a@x.com\nb@x.com");
    }

    #[test]
    fn test_run_scrape_task() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir, "<html><title> Example </title></html>");

        let outcome = app
            .run_task(&Task::ScrapeTitle {
                url: "https://example.com".to_string(),
            })
            .unwrap();

        assert_eq!(outcome.log_message(), "Scraped website title: Example");
        assert_eq!(
            fs::read_to_string(dir.path().join("website_title.txt")).unwrap(),
            "Website Title: Example"
        );
    }

    #[test]
    fn test_failure_messages() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir, "");

        let task = Task::MoveFiles {
            source: PathBuf::from("missing"),
            destination: PathBuf::from("out"),
        };
        let error = TaskError::SourceNotFound {
            path: PathBuf::from("missing"),
        };
        assert_eq!(
            app.failure_message(&task, &error),
            "Error moving JPG files: Source folder does not exist or is invalid: missing"
        );

        let task = Task::ScrapeTitle {
            url: "https://example.com".to_string(),
        };
        let error = TaskError::validation("Title tag not found");
        assert_eq!(
            app.failure_message(&task, &error),
            "Web scraping error: Title tag not found"
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        SmartTasks::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[mover]"));
        assert!(content.contains("[scraper]"));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
