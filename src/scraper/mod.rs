pub mod fetcher;
pub mod title_scraper;

pub use fetcher::{parse_page_url, HttpFetcher, PageFetcher};
pub use title_scraper::{extract_title, ScrapedTitle, TitleScraper};
