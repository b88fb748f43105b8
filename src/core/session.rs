use crate::config::Config;
use crate::core::{
    select_stream, Downloader, ExtractorEngine, FetchError, FetchResult, MediaKind, ProgressTracker,
    StreamFetcher,
};
use crate::extractors::YouTubeExtractor;
use crate::utils::sanitize_title;
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const INVALID_FILE_TYPE: &str = "Invalid file type. Choose 'video' or 'audio'.";

/// How one invocation ended.
#[derive(Debug)]
pub enum Outcome {
    Completed(PathBuf),
    InvalidFileType,
    NoSuitableStream,
    Failed(FetchError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}

/// User-facing line for a failed invocation.
pub fn failure_message(err: &FetchError) -> String {
    match err {
        FetchError::InvalidUrl => "\nError: Invalid YouTube URL.".to_string(),
        FetchError::VideoUnavailable { .. } => "\nError: This video is unavailable.".to_string(),
        FetchError::NoSuitableStream => "No suitable stream found.".to_string(),
        FetchError::Timeout => "\nError: Network timeout. Please check your connection.".to_string(),
        FetchError::Cancelled => "\nDownload canceled by user.".to_string(),
        FetchError::Http(_) | FetchError::Network(_) | FetchError::Io(_) | FetchError::Parse(_) => {
            format!("\nAn error occurred: {}", err)
        }
    }
}

/// Resolves one URL, picks a stream and writes it under `output_dir`.
pub struct DownloadSession {
    engine: ExtractorEngine,
    fetcher: Box<dyn StreamFetcher>,
    output_dir: PathBuf,
    show_progress: bool,
}

impl DownloadSession {
    pub fn new(engine: ExtractorEngine, fetcher: Box<dyn StreamFetcher>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            fetcher,
            output_dir: output_dir.into(),
            show_progress: false,
        }
    }

    /// Session wired to YouTube over a client built from `config`.
    pub fn from_config(config: &Config) -> FetchResult<Self> {
        let mut engine = ExtractorEngine::new();
        engine.register_extractor(Box::new(YouTubeExtractor::new(config)?));
        let downloader = Downloader::new(config)?;

        Ok(Self::new(engine, Box::new(downloader), config.output_dir.clone()).with_progress(true))
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Runs until finished or until Ctrl-C is pressed.
    pub async fn run<W: Write>(&self, url: &str, file_type: &str, out: &mut W) -> io::Result<Outcome> {
        let interrupted = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_until(url, file_type, out, interrupted).await
    }

    /// Runs until finished or until `shutdown` resolves, which cancels.
    pub async fn run_until<W, F>(&self, url: &str, file_type: &str, out: &mut W, shutdown: F) -> io::Result<Outcome>
    where
        W: Write,
        F: Future,
    {
        let kind = match file_type.parse::<MediaKind>() {
            Ok(kind) => kind,
            Err(e) => {
                debug!("{}", e);
                writeln!(out, "{}", INVALID_FILE_TYPE)?;
                return Ok(Outcome::InvalidFileType);
            }
        };

        let result = tokio::select! {
            result = self.download(url, kind, out) => result,
            _ = shutdown => Err(FetchError::Cancelled),
        };

        let outcome = match result {
            Ok(path) => {
                writeln!(out, "\nDownload complete! Saved to {}", path.display())?;
                Outcome::Completed(path)
            }
            Err(FetchError::NoSuitableStream) => {
                writeln!(out, "{}", failure_message(&FetchError::NoSuitableStream))?;
                Outcome::NoSuitableStream
            }
            Err(err) => {
                info!("Download failed: {:?}", err);
                writeln!(out, "{}", failure_message(&err))?;
                Outcome::Failed(err)
            }
        };

        out.flush()?;
        Ok(outcome)
    }

    async fn download<W: Write>(&self, url: &str, kind: MediaKind, out: &mut W) -> FetchResult<PathBuf> {
        let metadata = self.engine.resolve(url).await?;

        writeln!(out, "Title: {}", sanitize_title(&metadata.title))?;
        writeln!(out, "Author: {}", metadata.author.as_deref().unwrap_or("Unknown"))?;

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let stream = select_stream(&metadata.streams, kind).ok_or(FetchError::NoSuitableStream)?;
        info!("Selected {}", stream);

        let mut tracker = if self.show_progress {
            ProgressTracker::new(stream.filesize)
        } else {
            ProgressTracker::hidden(stream.filesize)
        };

        writeln!(out, "Downloading {}...", kind)?;
        out.flush()?;

        let saved = self.fetcher.fetch(stream, &self.output_dir, &mut tracker).await?;
        tracker.close();
        debug!("Tracked {} bytes", tracker.advanced());

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Extractor;

    #[test]
    fn every_failure_has_a_distinct_message() {
        let errors = [
            FetchError::InvalidUrl,
            FetchError::unavailable("private"),
            FetchError::NoSuitableStream,
            FetchError::Timeout,
            FetchError::Cancelled,
            FetchError::Parse("bad json".to_string()),
        ];
        let messages: Vec<String> = errors.iter().map(failure_message).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(messages[5], "\nAn error occurred: could not parse player response: bad json");
    }

    #[test]
    fn session_builds_from_default_config() {
        let session = DownloadSession::from_config(&Config::default()).unwrap();
        assert_eq!(session.output_dir, PathBuf::from("./downloads"));
        assert!(session.show_progress);
        assert_eq!(session.engine.extractors.len(), 1);
        assert_eq!(session.engine.extractors[0].name(), "YouTube");
    }
}
