use crate::core::{FetchError, FetchResult, VideoMetadata};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Resolves a video page URL into metadata and stream descriptors.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn suitable(&self, url: &Url) -> bool;
    async fn extract(&self, url: &Url) -> FetchResult<VideoMetadata>;
}

pub struct ExtractorEngine {
    pub extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorEngine {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn register_extractor(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    /// Parses `url` and hands it to the first extractor that accepts it.
    pub async fn resolve(&self, url: &str) -> FetchResult<VideoMetadata> {
        let parsed_url = parse_page_url(url)?;

        for extractor in &self.extractors {
            if extractor.suitable(&parsed_url) {
                debug!("Using {} extractor for {}", extractor.name(), parsed_url);
                return extractor.extract(&parsed_url).await;
            }
        }

        Err(FetchError::InvalidUrl)
    }
}

/// Parses a user-typed page URL; `youtu.be/ID` style input gets `https://`.
pub fn parse_page_url(url: &str) -> FetchResult<Url> {
    let url = url.trim();
    match Url::parse(url) {
        Ok(parsed) => Ok(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", url)).map_err(|_| FetchError::InvalidUrl)
        }
        Err(_) => Err(FetchError::InvalidUrl),
    }
}

impl Default for ExtractorEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_optional() {
        let parsed = parse_page_url("youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(parsed.as_str(), "https://youtu.be/dQw4w9WgXcQ");

        let parsed = parse_page_url("  www.youtube.com/watch?v=dQw4w9WgXcQ ").unwrap();
        assert_eq!(parsed.host_str(), Some("www.youtube.com"));

        let parsed = parse_page_url("http://youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(parsed.scheme(), "http");
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(parse_page_url("not a url"), Err(FetchError::InvalidUrl)));
        assert!(matches!(parse_page_url(""), Err(FetchError::InvalidUrl)));
    }
}
