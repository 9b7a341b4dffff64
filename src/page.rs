use anyhow::Result;

/// One rendered entry in the card list. Only valid for the current render:
/// drivers re-locate the element by `index` on activation rather than holding
/// a node reference that a re-render would invalidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingHandle {
    /// Position in document order; also the correlation key for list-side
    /// metadata (the age badge list lines up with the card list).
    pub index: usize,
    /// Element id, possibly empty.
    pub id: String,
    /// Absolute URL the card points at, or empty when it exposes none.
    pub link: String,
}

/// The browser-automation environment the pipeline runs against. The page is
/// a single-writer external store: `activate` mutates it, the read methods
/// observe the state it settled into, and strict sequencing in the runner is
/// what keeps read-after-write consistent.
pub trait PageDriver {
    /// One handle per card matching `selector`, in document order.
    fn list_cards(&mut self, selector: &str) -> Vec<ListingHandle>;

    /// Simulate a click on the card. The detail pane re-renders afterwards.
    fn activate(&mut self, handle: &ListingHandle, selector: &str) -> Result<()>;

    /// Trimmed text of the first match in the current page state, or `None`
    /// when nothing matches or the match is empty.
    fn read_text(&mut self, selector: &str) -> Option<String>;

    /// Trimmed text of the nth match (index correlation with the card list).
    fn read_text_at(&mut self, selector: &str, index: usize) -> Option<String>;
}

/// Scripted in-memory page for tests: each card carries the field texts its
/// activation reveals, plus an optional list-side age badge.
#[cfg(test)]
pub struct ScriptedPage {
    pub cards: Vec<ScriptedCard>,
    pub fail_clicks: Vec<usize>,
    active: Option<usize>,
    pub clicks: Vec<usize>,
}

#[cfg(test)]
#[derive(Clone, Default)]
pub struct ScriptedCard {
    pub id: String,
    pub link: String,
    pub fields: std::collections::HashMap<String, String>,
    pub age: Option<String>,
}

#[cfg(test)]
impl ScriptedPage {
    pub fn new(cards: Vec<ScriptedCard>) -> Self {
        ScriptedPage {
            cards,
            fail_clicks: Vec::new(),
            active: None,
            clicks: Vec::new(),
        }
    }
}

#[cfg(test)]
impl PageDriver for ScriptedPage {
    fn list_cards(&mut self, _selector: &str) -> Vec<ListingHandle> {
        self.cards
            .iter()
            .enumerate()
            .map(|(index, card)| ListingHandle {
                index,
                id: card.id.clone(),
                link: card.link.clone(),
            })
            .collect()
    }

    fn activate(&mut self, handle: &ListingHandle, _selector: &str) -> Result<()> {
        if self.fail_clicks.contains(&handle.index) {
            anyhow::bail!("card {} did not respond to click", handle.index);
        }
        self.clicks.push(handle.index);
        self.active = Some(handle.index);
        Ok(())
    }

    fn read_text(&mut self, selector: &str) -> Option<String> {
        let index = self.active?;
        self.cards
            .get(index)
            .and_then(|card| card.fields.get(selector))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn read_text_at(&mut self, _selector: &str, index: usize) -> Option<String> {
        self.cards
            .get(index)
            .and_then(|card| card.age.clone())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
