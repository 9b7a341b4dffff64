use crate::page::{ListingHandle, PageDriver};
use anyhow::{anyhow, Context, Result};
use log::warn;
use scraper::{Html, Selector};
use std::fs;
use std::path::{Path, PathBuf};

/// Offline driver that replays saved HTML: `list.html` for the card list and
/// `detail_<index>.html` for the pane each click would reveal. Lets the whole
/// pipeline run (and be exercised in tests) without a browser.
pub struct SnapshotDriver {
    dir: PathBuf,
    list: Html,
    detail: Option<Html>,
}

impl SnapshotDriver {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let list_path = dir.join("list.html");
        let html = fs::read_to_string(&list_path)
            .with_context(|| format!("failed to read {:?}", list_path))?;
        Ok(SnapshotDriver {
            dir,
            list: Html::parse_document(&html),
            detail: None,
        })
    }

    /// Config-supplied selectors may be malformed; treat that as a miss.
    fn parse_selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Invalid selector '{}': {:?}", selector, e);
                None
            }
        }
    }

    fn first_text(document: &Html, selector: &str) -> Option<String> {
        let parsed = Self::parse_selector(selector)?;
        document
            .select(&parsed)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

impl PageDriver for SnapshotDriver {
    fn list_cards(&mut self, selector: &str) -> Vec<ListingHandle> {
        let parsed = match Self::parse_selector(selector) {
            Some(parsed) => parsed,
            None => return Vec::new(),
        };
        self.list
            .select(&parsed)
            .enumerate()
            .map(|(index, element)| ListingHandle {
                index,
                id: element.value().attr("id").unwrap_or_default().to_string(),
                link: element.value().attr("href").unwrap_or_default().to_string(),
            })
            .collect()
    }

    fn activate(&mut self, handle: &ListingHandle, _selector: &str) -> Result<()> {
        let path = self.dir.join(format!("detail_{}.html", handle.index));
        let html = fs::read_to_string(&path)
            .map_err(|e| anyhow!("no snapshot for card {}: {}", handle.index + 1, e))?;
        self.detail = Some(Html::parse_document(&html));
        Ok(())
    }

    fn read_text(&mut self, selector: &str) -> Option<String> {
        Self::first_text(self.detail.as_ref()?, selector)
    }

    fn read_text_at(&mut self, selector: &str, index: usize) -> Option<String> {
        let parsed = Self::parse_selector(selector)?;
        self.list
            .select(&parsed)
            .nth(index)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
