pub mod chrome;
pub mod config;
pub mod enumerator;
pub mod exporter;
pub mod extractor;
pub mod logger;
pub mod page;
pub mod postprocess;
pub mod runner;
pub mod snapshot;
pub mod wait;

// Exporting types for convenience
pub use config::{ScrapeConfig, Selectors};
pub use exporter::ExportError;
pub use extractor::{Extractor, JobRecord};
pub use page::{ListingHandle, PageDriver};
pub use runner::{RunError, RunSummary, Runner};
pub use wait::WaitMode;
