pub mod controller;
pub mod fetcher;
pub mod record;

// Re-export common types
pub use controller::ScrapeController;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use record::{JobRecord, ScrapeResult, SynthesizedFields, NULL_VALUE};
