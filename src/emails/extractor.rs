use crate::error::{Result, TaskError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Local part, `@`, domain, then a dot and a TLD of two or more letters.
pub const EMAIL_PATTERN: &str = r"[\w.%+-]+@[\w.-]+\.[A-Za-z]{2,}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailReport {
    pub count: usize,
    pub output_file: PathBuf,
}

pub struct EmailExtractor {
    pattern: Regex,
}

impl EmailExtractor {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(EMAIL_PATTERN).map_err(|e| TaskError::Config {
            message: format!("Invalid email pattern: {}", e),
        })?;

        Ok(Self { pattern })
    }

    /// Unique matches in lexicographic order. Case is preserved, so
    /// `A@b.com` and `a@b.com` are distinct.
    pub fn find_emails(&self, text: &str) -> BTreeSet<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn extract(&self, input_file: &Path, output_file: &Path) -> Result<EmailReport> {
        if !input_file.exists() {
            return Err(TaskError::InputNotFound {
                path: input_file.to_path_buf(),
            });
        }

        let content = fs::read_to_string(input_file)?;
        let emails = self.find_emails(&content);

        tracing::debug!(
            input = %input_file.display(),
            bytes = content.len(),
            unique = emails.len(),
            "scanned for email addresses"
        );

        let joined = emails.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
        fs::write(output_file, joined)?;

        Ok(EmailReport {
            count: emails.len(),
            output_file: output_file.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn extractor() -> EmailExtractor {
        EmailExtractor::new().unwrap()
    }

    #[test]
    fn test_dedup_and_sort() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("emails_input.txt");
        let output = temp_dir.path().join("extracted_emails.txt");
        fs::write(&input, "contact b@x.com or a@x.com\nagain: a@x.com").unwrap();

        let report = extractor().extract(&input, &output).unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "a@x.com\nb@x.com");
    }

    #[test]
    fn test_case_sensitive_dedup() {
        let emails = extractor().find_emails("A@b.com a@b.com A@b.com");
        let emails: Vec<_> = emails.into_iter().collect();
        assert_eq!(emails, vec!["A@b.com", "a@b.com"]);
    }

    #[test]
    fn test_pattern_shapes() {
        let found = extractor().find_emails(
            "first.last+tag@mail.example.co.uk, 50%off@shop-1.io, bad@host, x@y.c, <jane_doe@corp.org>",
        );
        let found: Vec<_> = found.into_iter().collect();
        assert_eq!(
            found,
            vec![
                "50%off@shop-1.io",
                "first.last+tag@mail.example.co.uk",
                "jane_doe@corp.org",
            ]
        );
    }

    #[test]
    fn test_no_matches_writes_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        let output = temp_dir.path().join("out.txt");
        fs::write(&input, "nothing to see here").unwrap();

        let report = extractor().extract(&input, &output).unwrap();

        assert_eq!(report.count, 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_missing_input_leaves_output_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.txt");
        fs::write(&output, "previous").unwrap();

        let result = extractor().extract(&temp_dir.path().join("missing.txt"), &output);

        assert!(matches!(result, Err(TaskError::InputNotFound { .. })));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn test_overwrites_output_and_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        let output = temp_dir.path().join("out.txt");
        fs::write(&input, "z@z.org y@y.org z@z.org").unwrap();
        fs::write(&output, "stale content that is much longer than the result").unwrap();

        extractor().extract(&input, &output).unwrap();
        let first = fs::read(&output).unwrap();
        extractor().extract(&input, &output).unwrap();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, b"y@y.org\nz@z.org");
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.txt");
        fs::write(&input, [0xff, 0xfe, 0x00]).unwrap();

        let result = extractor().extract(&input, &temp_dir.path().join("out.txt"));
        assert!(matches!(result, Err(TaskError::Io(_))));
    }
}
