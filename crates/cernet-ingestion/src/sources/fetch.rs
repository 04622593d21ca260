//! Presence-cached downloads of raw source tables.
//!
//! A table is fetched only when its local file is missing; an existing file
//! is trusted as-is (no freshness or checksum check). Bytes stream into a
//! `.part` file beside the destination and are renamed into place only after
//! the whole body arrived, so the destination never holds a truncated table.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cernet_common::{CernetError, Result, SourceDescriptor};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Outcome of [`Fetcher::ensure_local`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// The file was already present; nothing was requested.
    Cached,
    /// The file was downloaded.
    Downloaded { bytes: u64 },
}

/// Downloads source tables into a data directory.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    data_dir: PathBuf,
}

impl Fetcher {
    /// `timeout` bounds connecting and each wait for more body bytes, not the
    /// whole transfer; large dumps may take far longer than it to arrive.
    pub fn new(data_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(concat!("cernet/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, data_dir: data_dir.into() })
    }

    /// Local path a source is stored at.
    pub fn local_path(&self, source: &SourceDescriptor) -> PathBuf {
        self.data_dir.join(&source.local_filename)
    }

    /// Make sure the source's raw table exists locally, downloading it if absent.
    pub async fn ensure_local(&self, source: &SourceDescriptor) -> Result<(PathBuf, FetchStatus)> {
        let dest = self.local_path(source);
        if dest.exists() {
            info!(source = %source.name, path = %dest.display(), "Already exists, skipping download");
            return Ok((dest, FetchStatus::Cached));
        }

        tokio::fs::create_dir_all(&self.data_dir).await?;
        info!(source = %source.name, url = %source.url, path = %dest.display(), "Downloading");
        let bytes = self.download(&source.url, &dest).await?;
        info!(source = %source.name, bytes, "Downloaded");
        Ok((dest, FetchStatus::Downloaded { bytes }))
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CernetError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let part = part_path(dest);
        let written: Result<u64> = async {
            let mut file = tokio::fs::File::create(&part).await?;
            let mut stream = response.bytes_stream();
            let mut written = 0u64;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&part, dest).await?;
            Ok::<u64, CernetError>(written)
        }
        .await;

        if written.is_err() {
            debug!(path = %part.display(), "Removing partial download");
            let _ = tokio::fs::remove_file(&part).await;
        }
        written
    }
}

/// `<dest>.part`
fn part_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
