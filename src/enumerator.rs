use crate::page::{ListingHandle, PageDriver};
use log::info;

/// Locate every job card in the current page state, in document order.
/// An empty result is a valid outcome, reported by the caller, not an error.
pub fn enumerate(page: &mut dyn PageDriver, selector: &str) -> Vec<ListingHandle> {
    let handles = page.list_cards(selector);
    info!("Found {} job cards", handles.len());
    handles
}
