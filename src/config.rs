use crate::error::{Result, TaskError};
use crate::mover::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub mover: MoverConfig,
    pub emails: EmailConfig,
    pub scraper: ScraperConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MoverConfig {
    pub extension: String,
    pub on_collision: CollisionPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub output_file: PathBuf,
    pub timeout: u64,
    pub user_agent: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logs.txt"),
        }
    }
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            extension: "jpg".to_string(),
            on_collision: CollisionPolicy::Overwrite,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("emails_input.txt"),
            output_file: PathBuf::from("extracted_emails.txt"),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("website_title.txt"),
            timeout: 10, // seconds
            user_agent: format!("smart-tasks/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TaskError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TaskError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TaskError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["smart-tasks.toml", ".smart-tasks.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        tracing::debug!(path = default_path, "loading configuration");
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref log_file) = cli_args.log_file {
            self.log.file = log_file.clone();
        }

        if let Some(ref extension) = cli_args.extension {
            self.mover.extension = extension.trim().to_string();
        }

        if let Some(policy) = cli_args.on_collision {
            self.mover.on_collision = policy;
        }

        if let Some(timeout) = cli_args.timeout {
            self.scraper.timeout = timeout;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| TaskError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| TaskError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.mover.extension.trim().trim_start_matches('.').is_empty() {
            return Err(TaskError::Config {
                message: "A file extension to move must be specified".to_string(),
            });
        }

        if self.scraper.timeout == 0 {
            return Err(TaskError::Config {
                message: "Scraper timeout must be greater than 0".to_string(),
            });
        }

        let paths = [
            ("log.file", &self.log.file),
            ("emails.input_file", &self.emails.input_file),
            ("emails.output_file", &self.emails.output_file),
            ("scraper.output_file", &self.scraper.output_file),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(TaskError::Config {
                    message: format!("{} must not be empty", key),
                });
            }
        }

        Ok(())
    }

    pub fn scraper_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.scraper.timeout)
    }

}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_file: Option<PathBuf>,
    pub extension: Option<String>,
    pub on_collision: Option<CollisionPolicy>,
    pub timeout: Option<u64>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_on_collision(mut self, policy: Option<CollisionPolicy>) -> Self {
        self.on_collision = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log.file, PathBuf::from("logs.txt"));
        assert_eq!(config.mover.extension, "jpg");
        assert_eq!(config.mover.on_collision, CollisionPolicy::Overwrite);
        assert_eq!(config.emails.input_file, PathBuf::from("emails_input.txt"));
        assert_eq!(config.emails.output_file, PathBuf::from("extracted_emails.txt"));
        assert_eq!(config.scraper.output_file, PathBuf::from("website_title.txt"));
        assert_eq!(config.scraper_timeout_duration(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.mover.extension = ".".to_string();
        assert!(config.validate().is_err());

        config.mover.extension = "   ".to_string();
        assert!(config.validate().is_err());

        config.mover.extension = " . ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scraper.timeout = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.log.file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.scraper.timeout = 42;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.scraper.timeout, 42);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[mover]\nextension = \"png\"\non_collision = \"skip\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.mover.extension, "png");
        assert_eq!(config.mover.on_collision, CollisionPolicy::Skip);
        assert_eq!(config.log.file, PathBuf::from("logs.txt"));
        assert_eq!(config.scraper.timeout, 10);
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[scraper]\ntimeout = \"soon\"").unwrap();

        let result = Config::load_from_file(temp_file.path());
        assert!(matches!(result, Err(TaskError::Config { .. })));
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(TaskError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_timeout(Some(30))
            .with_extension(Some(" .PNG ".to_string()))
            .with_on_collision(Some(CollisionPolicy::Fail))
            .with_log_file(Some(PathBuf::from("activity.log")));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.scraper.timeout, 30);
        assert_eq!(config.mover.extension, ".PNG");
        assert_eq!(config.mover.on_collision, CollisionPolicy::Fail);
        assert_eq!(config.log.file, PathBuf::from("activity.log"));
    }

    #[test]
    fn test_default_config_written_as_sample() {
        let temp_file = NamedTempFile::new().unwrap();
        Config::default().save_to_file(temp_file.path()).unwrap();

        let sample = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(sample.contains("[log]"));
        assert!(sample.contains("[mover]"));
        assert!(sample.contains("[emails]"));
        assert!(sample.contains("[scraper]"));
        assert!(sample.contains("on_collision = \"overwrite\""));
    }
}
