//! Extraction of structured data from model responses.

mod extractor;

pub use extractor::ResponseExtractor;
