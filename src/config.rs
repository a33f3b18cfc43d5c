//! Job description and the JSON config file that can carry one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::error::ConfigError;

/// What a single invocation should fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    /// Download one URI as-is.
    Simple { uri: String },
    /// Scrape `uri` for names matching `pattern`, keep those chosen by `which`.
    Scrape {
        uri: String,
        pattern: String,
        #[serde(default)]
        which: String,
    },
}

impl Job {
    pub fn uri(&self) -> &str {
        match self {
            Job::Simple { uri } | Job::Scrape { uri, .. } => uri,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri().trim().is_empty() {
            return Err(ConfigError::Invalid("uri must not be empty".into()));
        }
        if let Job::Scrape { pattern, .. } = self {
            if pattern.is_empty() {
                return Err(ConfigError::Invalid("pattern must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub save_as: Option<PathBuf>,
    pub job: Job,
}

/// Date and time values that may be referenced as `$Name` in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeVars {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub unix: i64,
}

impl TimeVars {
    pub fn now_utc() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    fn pairs(&self) -> [(&'static str, String); 7] {
        [
            ("$Year", format!("{:04}", self.year)),
            ("$Month", format!("{:02}", self.month)),
            ("$Day", format!("{:02}", self.day)),
            ("$Hour", format!("{:02}", self.hour)),
            ("$Minute", format!("{:02}", self.minute)),
            ("$Second", format!("{:02}", self.second)),
            ("$Unix", self.unix.to_string()),
        ]
    }
}

impl From<OffsetDateTime> for TimeVars {
    fn from(at: OffsetDateTime) -> Self {
        Self {
            year: at.year(),
            month: u8::from(at.month()),
            day: at.day(),
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
            unix: at.unix_timestamp(),
        }
    }
}

/// Replaces every `$Name` time variable in `contents`. Unknown names are left alone.
pub fn replace_time(contents: &str, vars: &TimeVars) -> String {
    vars.pairs()
        .iter()
        .fold(contents.to_owned(), |acc, (name, value)| acc.replace(*name, value))
}

/// Reads, expands and validates the config file at `path`.
pub fn load(path: &Path, vars: &TimeVars) -> Result<ConfigFile, ConfigError> {
    info!("Slurping config file {}", path.display());

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let expanded = replace_time(&raw, vars);

    let config: ConfigFile = serde_json::from_str(&expanded).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.job.validate()?;

    Ok(config)
}
