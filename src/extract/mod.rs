pub mod baseline;
pub mod content;

// Re-export common types
pub use baseline::baseline_record;
pub use content::{extract_page_content, PageContent, PageLink, PageLists};
