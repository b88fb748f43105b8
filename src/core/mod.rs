pub mod downloader;
pub mod error;
pub mod extractor;
pub mod metadata;
pub mod progress;
pub mod session;
pub mod streams;

pub use downloader::{Downloader, StreamFetcher};
pub use error::{FetchError, FetchResult};
pub use extractor::{parse_page_url, Extractor, ExtractorEngine};
pub use metadata::{InvalidMediaKind, MediaKind, StreamDescriptor, VideoMetadata};
pub use progress::{DownloadObserver, ProgressTracker};
pub use session::{DownloadSession, Outcome};
pub use streams::{select_stream, StreamQuery};
