use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;
use tracing::{error, info};

const POLL_INTERVAL: Duration = Duration::from_secs(10);

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:50.cyan/blue}] {bytes}/{total_bytes} ({eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

/// Foreground bar for the bytes streamed so far. Falls back to a spinner when
/// the size is unknown; indicatif keeps it hidden if stderr is not a terminal.
pub(crate) fn progress_bar(total_size: Option<u64>) -> ProgressBar {
    match total_size {
        Some(total) => {
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            ProgressBar::new(total).with_style(style)
        }
        None => {
            let style = ProgressStyle::default_spinner()
                .template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            ProgressBar::new_spinner().with_style(style)
        }
    }
}

/// Spawns a detached task that logs how much of `path` has been written.
///
/// The task is not synchronized with the copy. It may see a partial or final
/// size, can outlive the download by one poll, and quietly stops if the file
/// disappears underneath it.
pub(crate) fn spawn_tracker(content_length: Option<u64>, path: PathBuf) -> Option<JoinHandle<()>> {
    let Some(total) = content_length else {
        info!("Content-Length not available, can't track download");
        return None;
    };
    Some(tokio::spawn(async move {
        track_download(total, &path, POLL_INTERVAL).await;
    }))
}

pub(crate) async fn track_download(content_length: u64, path: &Path, every: Duration) {
    let mut file_size = 0;

    while file_size < content_length {
        tokio::time::sleep(every).await;

        file_size = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                error!("Couldn't get info on file {} to track: {e}", path.display());
                return;
            }
        };
        info!("Download progress: {:.2}%", percent(file_size, content_length));
    }
}

fn percent(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    done as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA: f64 = 1e-6;

    #[test]
    fn percent_calculations() {
        assert!((percent(50, 100) - 50.0).abs() < DELTA);
        assert!((percent(0, 100) - 0.0).abs() < DELTA);
        assert!((percent(1, 3) - 33.333333).abs() < 1e-4);
        assert!((percent(0, 0) - 100.0).abs() < DELTA);
    }

    #[test]
    fn unknown_length_skips_tracker() {
        assert!(spawn_tracker(None, PathBuf::from("unused")).is_none());
    }

    #[tokio::test]
    async fn stops_once_file_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.bin");
        std::fs::write(&path, [0u8; 64]).unwrap();

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            track_download(64, &path, Duration::from_millis(10)),
        )
        .await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn gives_up_when_file_vanishes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            track_download(64, &path, Duration::from_millis(10)),
        )
        .await;
        assert!(finished.is_ok());
    }
}
