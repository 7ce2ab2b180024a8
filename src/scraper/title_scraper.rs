use crate::error::{Result, TaskError};
use crate::scraper::fetcher::{parse_page_url, PageFetcher};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const TITLE_PATTERN: &str = r"(?is)<title>(.*?)</title>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTitle {
    pub url: String,
    pub title: String,
    pub output_file: PathBuf,
}

pub struct TitleScraper {
    fetcher: Box<dyn PageFetcher>,
    output_file: PathBuf,
    pattern: Regex,
}

impl TitleScraper {
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Result<Self> {
        let pattern = Regex::new(TITLE_PATTERN).map_err(|e| TaskError::Config {
            message: format!("Invalid title pattern: {}", e),
        })?;

        Ok(Self {
            fetcher,
            output_file: PathBuf::from("website_title.txt"),
            pattern,
        })
    }

    pub fn with_output_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = path.into();
        self
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn scrape_title(&self, url: &str) -> Result<ScrapedTitle> {
        let parsed = parse_page_url(url)?;
        let body = self.fetcher.fetch(&parsed)?;

        let title = find_title(&self.pattern, &body)
            .ok_or_else(|| TaskError::validation("Title tag not found"))?;

        fs::write(&self.output_file, format!("Website Title: {}", title))?;

        Ok(ScrapedTitle {
            url: parsed.to_string(),
            title,
            output_file: self.output_file.clone(),
        })
    }
}

fn find_title(pattern: &Regex, body: &str) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// First `<title>` element's text, trimmed. Tag matching ignores case and
/// the text may span lines.
pub fn extract_title(body: &str) -> Option<String> {
    let pattern = Regex::new(TITLE_PATTERN).ok()?;
    find_title(&pattern, body)
}
