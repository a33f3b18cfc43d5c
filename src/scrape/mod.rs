//! Scrape a listing page for names matching a pattern and pick which to fetch.
//!
//! The pipeline is strictly sequential: compile the pattern, fetch the whole
//! listing, extract matches, then select. Nothing is shared between calls.

mod extract;
mod fetch;
mod select;

pub use extract::{compile_pattern, extract_matches};
pub use fetch::{HttpFetcher, ListingFetcher};
pub use select::{select, SelectionPolicy};

use crate::error::ScrapeError;

/// Fetches `uri` and returns the names in it matching `pattern`, deduplicated,
/// sorted and filtered by `policy`.
pub async fn scrape_matches<F>(
    fetcher: &F,
    uri: &str,
    pattern: &str,
    policy: &SelectionPolicy,
) -> Result<Vec<String>, ScrapeError>
where
    F: ListingFetcher + ?Sized,
{
    let pattern = compile_pattern(pattern)?;
    let listing = fetcher.fetch(uri).await?;
    let matches = extract_matches(&pattern, listing.as_slice())?;
    Ok(select(matches, policy))
}

/// Joins each selected name onto `base` to form a fetchable locator.
pub fn locators(base: &str, names: &[String]) -> Vec<String> {
    let base = base.trim_end_matches('/');
    names.iter().map(|name| format!("{base}/{name}")).collect()
}
