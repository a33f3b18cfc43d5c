//! gather: download a URI, or scrape a listing page for matching names and
//! download a chosen subset of them.

pub mod app;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod logging;
pub mod route;
pub mod scrape;

pub use error::{ConfigError, DownloadError, ScrapeError};
pub use scrape::{scrape_matches, SelectionPolicy};
