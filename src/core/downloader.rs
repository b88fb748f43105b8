use crate::config::Config;
use crate::core::{DownloadObserver, FetchError, FetchResult, StreamDescriptor};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// Writes one stream to disk, reporting to `observer` as bytes arrive.
#[async_trait]
pub trait StreamFetcher: Send + Sync {
    async fn fetch(
        &self,
        stream: &StreamDescriptor,
        output_dir: &Path,
        observer: &mut dyn DownloadObserver,
    ) -> FetchResult<PathBuf>;
}

pub struct Downloader {
    client: reqwest::Client,
    pub chunk_size: u64,
}

impl Downloader {
    pub fn new(config: &Config) -> FetchResult<Self> {
        Ok(Self::with_client(config.http_client()?, config.chunk_size))
    }

    pub fn with_client(client: reqwest::Client, chunk_size: u64) -> Self {
        Self {
            client,
            chunk_size: chunk_size.max(1),
        }
    }

    async fn request(&self, url: &str) -> FetchResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .header("Accept", "*/*")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Referer", "https://www.youtube.com/")
            .header("Origin", "https://www.youtube.com")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }
        Ok(response)
    }

    /// Copies the response body into `file`, returning bytes written.
    async fn pump(
        &self,
        response: reqwest::Response,
        file: &mut File,
        downloaded: &mut u64,
        total: Option<u64>,
        observer: &mut dyn DownloadObserver,
    ) -> FetchResult<u64> {
        let mut written = 0;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            *downloaded += chunk.len() as u64;
            let remaining = total.map_or(0, |t| t.saturating_sub(*downloaded));
            observer.on_progress(&chunk, remaining);
        }
        Ok(written)
    }
}

/// Appends the platform's `range=<start>-<end>` query parameter.
pub fn ranged_url(url: &str, start: u64, end: u64) -> FetchResult<String> {
    let mut parsed = Url::parse(url).map_err(|e| FetchError::Parse(format!("stream url: {}", e)))?;
    parsed
        .query_pairs_mut()
        .append_pair("range", &format!("{}-{}", start, end));
    Ok(parsed.into())
}

#[async_trait]
impl StreamFetcher for Downloader {
    async fn fetch(
        &self,
        stream: &StreamDescriptor,
        output_dir: &Path,
        observer: &mut dyn DownloadObserver,
    ) -> FetchResult<PathBuf> {
        let output_path = output_dir.join(&stream.default_filename);
        info!("Downloading itag {} to {}", stream.itag, output_path.display());

        let mut file = File::create(&output_path).await?;
        let mut downloaded = 0u64;

        match stream.filesize {
            Some(total) if total > 0 => {
                while downloaded < total {
                    let end = (downloaded + self.chunk_size - 1).min(total - 1);
                    debug!("Requesting bytes {}-{} of {}", downloaded, end, total);
                    let response = self.request(&ranged_url(&stream.url, downloaded, end)?).await?;
                    let written = self
                        .pump(response, &mut file, &mut downloaded, Some(total), observer)
                        .await?;
                    if written == 0 {
                        return Err(FetchError::Io(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            format!("stream ended after {} of {} bytes", downloaded, total),
                        )));
                    }
                }
            }
            _ => {
                debug!("Stream size unknown, fetching in one request");
                let response = self.request(&stream.url).await?;
                let total = response.content_length();
                self.pump(response, &mut file, &mut downloaded, total, observer)
                    .await?;
            }
        }

        file.flush().await?;
        info!("Downloaded {} bytes to {}", downloaded, output_path.display());
        observer.on_complete(&output_path);

        Ok(output_path)
    }
}
