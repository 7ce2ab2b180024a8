use crate::error::{Result, TaskError};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl LogEntry {
    /// Line breaks in `message` are folded into spaces so the entry stays
    /// on one line of the log file.
    pub fn now(message: &str) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            message: single_line(message),
        }
    }

    /// Parses a line written by [`FileLogSink`]. Returns `None` for anything
    /// that does not start with a well-formed timestamp.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (timestamp, message) = line.split_once(" - ")?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;

        Some(Self {
            timestamp,
            message: message.to_string(),
        })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.message
        )
    }
}

fn single_line(message: &str) -> String {
    message
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append-only destination for activity messages.
pub trait LogSink {
    fn record(&self, message: &str) -> Result<LogEntry>;
}

/// Appends entries to a flat text file, opening and closing it on every call.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_entries(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| TaskError::Log {
            path: self.path.clone(),
            source,
        })?;

        Ok(content.lines().filter_map(LogEntry::parse_line).collect())
    }
}

impl LogSink for FileLogSink {
    fn record(&self, message: &str) -> Result<LogEntry> {
        let entry = LogEntry::now(message);
        let to_log_error = |source| TaskError::Log {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_log_error)?;

        writeln!(file, "{}", entry).map_err(to_log_error)?;

        tracing::debug!(path = %self.path.display(), message, "activity recorded");
        Ok(entry)
    }
}

/// Keeps entries in memory; useful when embedding the dispatcher.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, message: &str) -> Result<LogEntry> {
        let entry = LogEntry::now(message);
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_format() {
        let entry = LogEntry {
            timestamp: NaiveDateTime::parse_from_str("2024-03-05 07:08:09", TIMESTAMP_FORMAT)
                .unwrap(),
            message: "Moved 3 JPG files".to_string(),
        };
        assert_eq!(entry.to_string(), "2024-03-05 07:08:09 - Moved 3 JPG files");
    }

    #[test]
    fn test_parse_line() {
        let entry = LogEntry::parse_line("2024-03-05 07:08:09 - Email extraction error: x - y").unwrap();
        assert_eq!(entry.message, "Email extraction error: x - y");
        assert_eq!(entry.timestamp.format(TIMESTAMP_FORMAT).to_string(), "2024-03-05 07:08:09");

        assert!(LogEntry::parse_line("garbage").is_none());
        assert!(LogEntry::parse_line("yesterday - something").is_none());
    }

    #[test]
    fn test_file_sink_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileLogSink::new(temp_dir.path().join("logs.txt"));

        sink.record("first").unwrap();
        sink.record("second").unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));

        let entries = sink.read_entries().unwrap();
        let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_multiline_message_written_as_one_line() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileLogSink::new(temp_dir.path().join("logs.txt"));

        let entry = sink
            .record("Scraped website title: Line one\r\nLine two\n")
            .unwrap();
        assert_eq!(entry.message, "Scraped website title: Line one Line two");

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        let entries = sink.read_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, entry.message);
    }

    #[test]
    fn test_file_sink_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs.txt");
        fs::write(&path, "2020-01-01 00:00:00 - older\n").unwrap();

        let sink = FileLogSink::new(&path);
        sink.record("newer").unwrap();

        let entries = sink.read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "older");
    }

    #[test]
    fn test_file_sink_unwritable_path() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileLogSink::new(temp_dir.path().join("missing").join("logs.txt"));

        let result = sink.record("lost");
        assert!(matches!(result, Err(TaskError::Log { .. })));
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileLogSink::new(temp_dir.path().join("logs.txt"));
        assert!(sink.read_entries().unwrap().is_empty());
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemoryLogSink::new();
        sink.record("one").unwrap();
        sink.record("two").unwrap();
        assert_eq!(sink.messages(), vec!["one", "two"]);

        sink.record("three\nfour").unwrap();
        assert_eq!(sink.messages()[2], "three four");
    }
}
