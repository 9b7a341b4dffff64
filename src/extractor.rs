use crate::config::{ScrapeConfig, Selectors};
use crate::page::{ListingHandle, PageDriver};
use crate::wait::{self, WaitMode};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// One exported listing. Every field degrades to an empty string when its
/// source element is absent at read time; missing data never aborts a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub description: String,
    pub link: String,
    pub age: String,
}

impl JobRecord {
    /// True when nothing at all was extracted, link included.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.company.is_empty()
            && self.description.is_empty()
            && self.link.is_empty()
            && self.age.is_empty()
    }
}

pub struct Extractor {
    selectors: Selectors,
    wait: WaitMode,
    settle_ms: u64,
    poll_ms: u64,
}

impl Extractor {
    pub fn new(config: &ScrapeConfig) -> Self {
        Extractor {
            selectors: config.selectors.clone(),
            wait: config.wait,
            settle_ms: config.settle_ms,
            poll_ms: config.poll_ms,
        }
    }

    /// Click the card, wait for the pane, read the fields. Per-field misses
    /// become empty strings; a card that won't activate yields a partial
    /// record (link and age only) so the loop can move on.
    pub fn extract(&self, page: &mut dyn PageDriver, handle: &ListingHandle) -> JobRecord {
        let mut record = JobRecord {
            link: handle.link.clone(),
            ..JobRecord::default()
        };
        // The age badge lives on the list side, correlated by index, so it is
        // readable whether or not the click lands.
        record.age = page
            .read_text_at(&self.selectors.age, handle.index)
            .unwrap_or_default();

        if let Err(e) = page.activate(handle, &self.selectors.card) {
            warn!(
                "Could not activate card {}: {}. Recording partial data.",
                handle.index + 1,
                e
            );
            return record;
        }
        debug!("Clicked {}", display_id(handle));

        self.settle(page);

        record.description = page
            .read_text(&self.selectors.description)
            .unwrap_or_default();
        record.company = page.read_text(&self.selectors.company).unwrap_or_default();
        record.title = page.read_text(&self.selectors.title).unwrap_or_default();

        info!("Fetched {} job", record.company);
        record
    }

    fn settle(&self, page: &mut dyn PageDriver) {
        match self.wait {
            WaitMode::Fixed => wait::settle_fixed(self.settle_ms),
            WaitMode::Poll => {
                let title = self.selectors.title.clone();
                let company = self.selectors.company.clone();
                let settled = wait::settle_until(self.poll_ms, self.settle_ms, || {
                    page.read_text(&title).is_some() && page.read_text(&company).is_some()
                });
                if !settled {
                    warn!(
                        "Detail pane did not settle within {} ms; reading anyway.",
                        self.settle_ms
                    );
                }
            }
        }
    }
}

fn display_id(handle: &ListingHandle) -> String {
    if handle.id.is_empty() {
        format!("card #{}", handle.index + 1)
    } else {
        handle.id.clone()
    }
}
