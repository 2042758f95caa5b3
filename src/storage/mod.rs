pub mod results;

// Re-export common functions
pub use results::{read_results, write_results};
