pub mod extractor;

pub use extractor::{EmailExtractor, EmailReport, EMAIL_PATTERN};
