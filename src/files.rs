//! Local file helpers: downloads into randomly named files and base64 encoding

use base64::{engine::general_purpose, Engine as _};
use futures_util::StreamExt;
use rand::Rng;
use reqwest::{Client as HttpClient, StatusCode};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{Result, SdkError};

const RANDOM_NAME_LEN: usize = 8;
const FALLBACK_EXTENSION: &str = "bin";

/// A file removed from disk when dropped unless [`TempFile::keep`] is called
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    keep: bool,
}

impl TempFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keep: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Disarms the cleanup and hands back the path
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("removed temporary file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Builds `<epoch-ms>_<8 random lowercase letters>.<ext>` for a download.
///
/// The extension is taken lowercased from the last path segment of the
/// URL, falling back to `bin`.
pub fn random_file_name(url: &Url) -> String {
    let extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|last| Path::new(last).extension())
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    let mut rng = rand::thread_rng();
    let letters: String = (0..RANDOM_NAME_LEN)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect();

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    format!("{}_{}.{}", millis, letters, extension)
}

/// Downloads `raw_url` into `dir` under a random file name.
///
/// `dir` is created if missing. A partially written file is removed on failure.
pub async fn download_from_url(raw_url: &str, dir: &Path, timeout: Duration) -> Result<PathBuf> {
    let url = Url::parse(raw_url)?;
    tokio::fs::create_dir_all(dir).await?;

    let http_client = HttpClient::builder().timeout(timeout).build()?;
    let response = http_client.get(url.clone()).send().await?;
    if response.status() != StatusCode::OK {
        return Err(SdkError::Download(format!("bad status: {}", response.status())));
    }

    let target = TempFile::new(dir.join(random_file_name(&url)));
    log::debug!("downloading {} to {}", url, target.path().display());

    let mut file = tokio::fs::File::create(target.path()).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    Ok(target.keep())
}

/// Reads a file and returns its contents base64 encoded
pub async fn encode_file_base64(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(general_purpose::STANDARD.encode(bytes))
}
