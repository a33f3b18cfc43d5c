//! Error types for gather.
//!
//! Each stage has its own error enum so callers can tell a bad pattern apart
//! from a dead host or an unwritable destination. None of them are retried;
//! the binary reports the first one and exits non-zero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the scrape-and-select pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The pattern did not compile. Raised before the listing is fetched.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The listing request never produced a response.
    #[error("failed to fetch listing {uri}: {source}")]
    Transport {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    /// The listing host answered with a non-success status.
    #[error("listing {uri} returned {status}")]
    Status {
        uri: String,
        status: reqwest::StatusCode,
    },

    /// Reading the listing body failed mid-scan.
    #[error("failed to scan listing: {0}")]
    Scan(#[from] io::Error),
}

/// Failures while copying a remote resource to disk.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("error getting {uri}: {source}")]
    Transport {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{uri} returned {status}")]
    Status {
        uri: String,
        status: reqwest::StatusCode,
    },

    #[error("failed reading body of {uri}: {source}")]
    Stream {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error creating file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to download {uri} to {path}: {source}")]
    Write {
        uri: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while resolving what to run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("no save path given; pass --save-as or set `save_as` in the config file")]
    MissingSaveAs,
}
