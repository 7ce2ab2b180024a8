use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Source folder does not exist or is invalid: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("{message}")]
    Validation { message: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("HTTP request failed: {message}")]
    Http { message: String, status: Option<u16> },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Destination file already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Cannot write activity log {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TaskError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        TaskError::Validation {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TaskError::SourceNotFound { .. } | TaskError::InputNotFound { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TaskError::Validation { .. } | TaskError::InvalidUrl { .. }
        )
    }

    pub fn is_http(&self) -> bool {
        matches!(self, TaskError::Http { .. } | TaskError::Timeout { .. })
    }

    /// Errors that end the menu loop instead of being reported per task.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TaskError::Log { .. })
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for TaskError {
    fn user_message(&self) -> String {
        match self {
            TaskError::SourceNotFound { path } => {
                format!("Source folder does not exist or is invalid: {}", path.display())
            }
            TaskError::InputNotFound { path } => {
                format!("Input file not found: {}", path.display())
            }
            TaskError::Http {
                status: Some(code),
                message,
            } => {
                format!("Server responded with HTTP {}: {}", code, message)
            }
            TaskError::Http { message, .. } => {
                format!("Network error: {}", message)
            }
            TaskError::Log { path, source } => {
                format!("Activity log {} is not writable: {}", path.display(), source)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            TaskError::SourceNotFound { .. } => Some(
                "Check the folder path; relative paths are resolved from the current directory.".to_string()
            ),
            TaskError::InputNotFound { path } => Some(format!(
                "Create {} with the text to scan, or point [emails] input_file at an existing file.",
                path.display()
            )),
            TaskError::InvalidUrl { .. } => Some(
                "Enter a full address including the scheme, e.g. https://example.com".to_string()
            ),
            TaskError::Timeout { .. } => Some(
                "The site did not answer in time. Try again or raise the limit with --timeout.".to_string()
            ),
            TaskError::Http { status: None, .. } => Some(
                "Check your internet connection and that the host name is spelled correctly.".to_string()
            ),
            TaskError::DestinationExists { .. } => Some(
                "Remove the existing file or run with --on-collision overwrite or skip.".to_string()
            ),
            TaskError::Config { .. } => Some(
                "Check your configuration file syntax; run with --generate-config for a template.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(error: reqwest::Error) -> Self {
        TaskError::Http {
            message: error.to_string(),
            status: error.status().map(|s| s.as_u16()),
        }
    }
}

impl From<toml::de::Error> for TaskError {
    fn from(error: toml::de::Error) -> Self {
        TaskError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
