//! Job posting scraper: fetch a page, extract its structured text, derive a
//! heuristic record and let a language model fill in the rest.

pub mod cli;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod llm;
pub mod storage;
pub mod utils;

pub use cli::config::ScraperConfig;
pub use crawler::{JobRecord, ScrapeController, ScrapeResult};
pub use error::{FailureKind, FetchError, ScrapeError, SynthesisError};
pub use extract::PageContent;
