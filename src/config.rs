use crate::wait::WaitMode;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "exporter_config.json";
pub const DEFAULT_OUTPUT_FILE: &str = "glassdoor_exported_data.json";

/// CSS selectors for the pieces of the page we read. These are configuration,
/// not logic: markup class names churn, so they must be overridable without
/// touching code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// One match per job card in the list; also the click target.
    pub card: String,
    /// Title heading inside the detail pane.
    pub title: String,
    /// Employer name inside the detail pane.
    pub company: String,
    /// Full description inside the detail pane.
    pub description: String,
    /// Listing-age badge on the card list side (index-correlated with `card`).
    pub age: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            card: ".JobCard_trackingLink__HMyun".to_string(),
            title: ".heading_Level1__soLZs".to_string(),
            company: ".EmployerProfile_employerNameHeading__bXBYr".to_string(),
            description: ".JobDetails_jobDescription__uW_fK".to_string(),
            age: ".JobCard_listingAge__jJsuc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Page to drive with a headless browser. Ignored when `snapshot_dir` is set.
    pub target_url: Option<String>,
    /// Replay saved HTML snapshots from this directory instead of a live page.
    pub snapshot_dir: Option<PathBuf>,
    pub headless: bool,
    pub output_path: PathBuf,
    /// When set, also write one JSON file per job (keyed by jobListingId) here.
    pub jobs_dir: Option<PathBuf>,
    pub wait: WaitMode,
    /// Fixed settle duration, and the poll deadline in `poll` mode.
    pub settle_ms: u64,
    pub poll_ms: u64,
    /// Cap on processed cards. On by default to bound runtime on long lists.
    pub max_items: Option<usize>,
    /// Optional [min, max] jittered delay between items, in milliseconds.
    pub item_delay_ms: Option<[u64; 2]>,
    /// Render the JSON to stdout and write nothing.
    pub dry_run: bool,
    pub selectors: Selectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            target_url: None,
            snapshot_dir: None,
            headless: true,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            jobs_dir: None,
            wait: WaitMode::Poll,
            settle_ms: 5000,
            poll_ms: 250,
            max_items: Some(50),
            item_delay_ms: None,
            dry_run: false,
            selectors: Selectors::default(),
        }
    }
}

impl ScrapeConfig {
    /// Load from a JSON file, falling back to defaults when the file is
    /// missing or malformed. A bad config file should never kill the run.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {:?}. Using defaults.", path);
            return ScrapeConfig::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<ScrapeConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    error!("Failed to parse config {:?}: {}. Using defaults.", path, e);
                    ScrapeConfig::default()
                }
            },
            Err(e) => {
                error!("Failed to read config {:?}: {}. Using defaults.", path, e);
                ScrapeConfig::default()
            }
        }
    }
}
