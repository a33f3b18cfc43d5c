//! Stream remote resources to local files.

mod progress;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::info;

use crate::error::DownloadError;

/// Downloads each of `uris` in turn. With more than one URI, the i-th one is
/// saved to `save_as` suffixed with `_i` (see [`increment_path`]).
pub async fn download_all(client: &Client, uris: &[String], save_as: &Path) -> Result<Vec<PathBuf>, DownloadError> {
    let mut saved = Vec::with_capacity(uris.len());

    for (i, uri) in uris.iter().enumerate() {
        let path = if uris.len() > 1 {
            increment_path(save_as, i)
        } else {
            save_as.to_path_buf()
        };
        download_file(client, uri, &path).await?;
        saved.push(path);
    }

    Ok(saved)
}

/// Streams the body of `uri` into `path`, creating or truncating it.
pub async fn download_file(client: &Client, uri: &str, path: &Path) -> Result<u64, DownloadError> {
    info!("Downloading {uri} to {}", path.display());

    let response = client
        .get(uri)
        .send()
        .await
        .map_err(|source| DownloadError::Transport {
            uri: uri.to_owned(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            uri: uri.to_owned(),
            status,
        });
    }

    let mut file = File::create(path).await.map_err(|source| DownloadError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let write_err = |source| DownloadError::Write {
        uri: uri.to_owned(),
        path: path.to_path_buf(),
        source,
    };

    let total_size = response.content_length();
    let pb = progress::progress_bar(total_size);
    // detached; see spawn_tracker
    let _ = progress::spawn_tracker(total_size, path.to_path_buf());

    // stream downloading
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| DownloadError::Stream {
            uri: uri.to_owned(),
            source,
        })?;
        file.write_all(&chunk).await.map_err(write_err)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    pb.finish_and_clear();
    file.sync_all().await.map_err(write_err)?;

    info!("Finished downloading {uri} ({downloaded} bytes)");
    Ok(downloaded)
}

/// Adds `_i` to the file name, before the last extension if there is one.
///
/// `data/updates.tar.gz` becomes `data/updates.tar_1.gz`, `data/latest`
/// becomes `data/latest_1`.
pub fn increment_path(path: &Path, i: usize) -> PathBuf {
    let suffix = format!("_{i}");

    let (Some(stem), Some(ext)) = (path.file_stem(), path.extension()) else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(&suffix);
        return PathBuf::from(raw);
    };

    let mut name = OsString::from(stem);
    name.push(&suffix);
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}
