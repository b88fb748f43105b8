pub mod cli;
pub mod config;
pub mod core;
pub mod extractors;
pub mod utils;

pub use core::{
    DownloadObserver, DownloadSession, Downloader, ExtractorEngine, FetchError, MediaKind, Outcome,
    ProgressTracker, StreamDescriptor, StreamFetcher, VideoMetadata,
};
pub use extractors::YouTubeExtractor;
