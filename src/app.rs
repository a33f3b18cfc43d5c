use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::cli::{Action, Invocation};
use crate::config::{self, Job, TimeVars};
use crate::download::download_all;
use crate::error::ConfigError;
use crate::route;
use crate::scrape::{compile_pattern, locators, scrape_matches, HttpFetcher, SelectionPolicy};

/// Settles which job to run and where its output goes. A `--save-as` on the
/// command line beats the one in a config file.
pub fn resolve_job(invocation: &Invocation) -> Result<(Job, PathBuf), ConfigError> {
    let (job, config_save_as) = match &invocation.action {
        Action::Job(job) => {
            job.validate()?;
            (job.clone(), None)
        }
        Action::Run(path) => {
            let config = config::load(path, &TimeVars::now_utc())?;
            (config.job, config.save_as)
        }
    };

    let save_as = invocation
        .save_as
        .clone()
        .or(config_save_as)
        .ok_or(ConfigError::MissingSaveAs)?;
    Ok((job, save_as))
}

/// Runs one invocation to completion and returns the files written.
pub async fn run(invocation: Invocation) -> Result<Vec<PathBuf>> {
    let process_start = Instant::now();

    let (job, save_as) = resolve_job(&invocation)?;

    // a bad pattern should fail before any network I/O
    if let Job::Scrape { pattern, .. } = &job {
        compile_pattern(pattern)?;
    }

    let route = route::resolve(job.uri(), invocation.proxy.as_deref()).await?;
    let client = route.client()?;

    let uris = match &job {
        Job::Simple { uri } => {
            info!("File to download: {uri}");
            vec![uri.clone()]
        }
        Job::Scrape { uri, pattern, which } => {
            let fetcher = HttpFetcher::new(client.clone());
            let names = scrape_matches(&fetcher, uri, pattern, &SelectionPolicy::parse(which))
                .await
                .context("Failed to find matching files")?;
            let files = locators(uri, &names);
            info!("Files to scrape: {files:?}");
            files
        }
    };

    if uris.is_empty() {
        warn!("No files matched; nothing to download");
    }

    let saved = download_all(&client, &uris, &save_as).await?;

    info!("Process completed in {:?}", process_start.elapsed());
    Ok(saved)
}
