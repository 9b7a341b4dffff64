use crate::page::{ListingHandle, PageDriver};
use anyhow::{anyhow, Context, Result};
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::warn;
use std::sync::Arc;
use url::Url;

/// Live-page driver: launches a Chrome instance, navigates to the listing
/// page and maps the `PageDriver` contract onto the DevTools protocol.
///
/// Handles are re-located by index on every activation instead of holding
/// element references, so a list re-render between enumeration and click
/// degrades to a logged miss rather than a stale-node failure.
pub struct ChromeDriver {
    // Dropping the Browser kills the Chrome process; keep it alive with the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    pub fn launch(url: &str, headless: bool) -> Result<Self> {
        let options = LaunchOptionsBuilder::default()
            .headless(headless)
            .build()
            .map_err(|e| anyhow!("failed to build launch options: {}", e))?;
        let browser = Browser::new(options).context("failed to launch Chrome")?;
        let tab = browser.new_tab().context("failed to open a tab")?;
        tab.navigate_to(url)
            .with_context(|| format!("failed to navigate to {}", url))?;
        tab.wait_until_navigated()
            .context("page never finished loading")?;
        Ok(ChromeDriver {
            _browser: browser,
            tab,
        })
    }

    fn attribute(element: &headless_chrome::Element, name: &str) -> String {
        element
            .get_attribute_value(name)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Card hrefs are often relative; resolve them against the page URL so
    /// the exported link is a well-formed absolute URL.
    fn absolute_link(&self, href: &str) -> String {
        if href.is_empty() || Url::parse(href).is_ok() {
            return href.to_string();
        }
        match Url::parse(&self.tab.get_url()).and_then(|base| base.join(href)) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => href.to_string(),
        }
    }
}

impl PageDriver for ChromeDriver {
    fn list_cards(&mut self, selector: &str) -> Vec<ListingHandle> {
        let elements = match self.tab.find_elements(selector) {
            Ok(elements) => elements,
            Err(e) => {
                warn!("No elements matched '{}': {}", selector, e);
                return Vec::new();
            }
        };
        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let href = Self::attribute(element, "href");
                ListingHandle {
                    index,
                    id: Self::attribute(element, "id"),
                    link: self.absolute_link(&href),
                }
            })
            .collect()
    }

    fn activate(&mut self, handle: &ListingHandle, selector: &str) -> Result<()> {
        let elements = self
            .tab
            .find_elements(selector)
            .with_context(|| format!("no cards matched '{}'", selector))?;
        let element = elements
            .get(handle.index)
            .ok_or_else(|| anyhow!("card {} gone after re-render", handle.index + 1))?;
        element.click()?;
        Ok(())
    }

    fn read_text(&mut self, selector: &str) -> Option<String> {
        self.tab
            .find_element(selector)
            .ok()
            .and_then(|element| element.get_inner_text().ok())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn read_text_at(&mut self, selector: &str, index: usize) -> Option<String> {
        let elements = self.tab.find_elements(selector).ok()?;
        elements
            .get(index)
            .and_then(|element| element.get_inner_text().ok())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
