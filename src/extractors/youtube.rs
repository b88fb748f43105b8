use crate::config::Config;
use crate::core::{Extractor, FetchError, FetchResult, StreamDescriptor, VideoMetadata};
use crate::utils::default_filename;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use url::Url;

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("valid video id regex"))
}

fn player_response_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"ytInitialPlayerResponse"?\s*[=:]\s*\{"#).expect("valid player response regex")
    })
}

pub struct YouTubeExtractor {
    client: reqwest::Client,
}

impl YouTubeExtractor {
    pub fn new(config: &Config) -> FetchResult<Self> {
        Ok(Self::with_client(config.http_client()?))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn extract_video_id(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

        let candidate = if host == "youtu.be" {
            segments.next().map(|s| s.to_string())
        } else if host == "youtube.com" || host.ends_with(".youtube.com") {
            match url.query_pairs().find(|(key, _)| key == "v") {
                Some((_, v)) => Some(v.to_string()),
                None => match segments.next() {
                    Some("embed" | "shorts" | "v" | "live") => segments.next().map(|s| s.to_string()),
                    _ => None,
                },
            }
        } else {
            None
        };

        candidate.filter(|id| video_id_pattern().is_match(id))
    }

    async fn fetch_watch_page(&self, video_id: &str) -> FetchResult<String> {
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let response = self
            .client
            .get(&watch_url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Accept-Encoding", "identity")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::unavailable("watch page not found"));
        }
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        let html = response.text().await?;
        if html.is_empty() {
            return Err(FetchError::Parse("empty response from YouTube".to_string()));
        }
        Ok(html)
    }
}

/// Pulls the `ytInitialPlayerResponse` object out of a watch page.
pub fn extract_player_response(html: &str) -> FetchResult<Value> {
    let found = player_response_pattern()
        .find(html)
        .ok_or_else(|| FetchError::Parse("ytInitialPlayerResponse not found".to_string()))?;

    // Parse exactly one JSON value starting at the opening brace.
    let json_start = found.end() - 1;
    let mut values = serde_json::Deserializer::from_str(&html[json_start..]).into_iter::<Value>();
    match values.next() {
        Some(value) => Ok(value?),
        None => Err(FetchError::Parse("empty player response".to_string())),
    }
}

/// Maps a non-playable `playabilityStatus` to `VideoUnavailable`.
pub fn check_playability(player_response: &Value) -> FetchResult<()> {
    let Some(playability) = player_response.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability.get("status").and_then(Value::as_str).unwrap_or("OK");
    let reason = playability
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or("This video is unavailable")
        .to_string();

    match status {
        "OK" => {
            let is_live = player_response
                .pointer("/videoDetails/isLive")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if is_live {
                return Err(FetchError::unavailable("live streams cannot be downloaded"));
            }
            Ok(())
        }
        "LOGIN_REQUIRED" | "ERROR" | "UNPLAYABLE" | "LIVE_STREAM_OFFLINE" | "AGE_CHECK_REQUIRED" => {
            debug!("Playability status {}: {}", status, reason);
            Err(FetchError::unavailable(reason))
        }
        other => {
            warn!("Unknown playability status {}", other);
            Err(FetchError::unavailable(reason))
        }
    }
}

/// Builds metadata from an already-playable player response.
pub fn metadata_from_player_response(player_response: &Value, video_id: &str) -> FetchResult<VideoMetadata> {
    let video_details = player_response
        .get("videoDetails")
        .ok_or_else(|| FetchError::Parse("no videoDetails in player response".to_string()))?;

    let title = video_details
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let author = video_details
        .get("author")
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    let duration = video_details
        .get("lengthSeconds")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<u64>().ok());

    let view_count = video_details
        .get("viewCount")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<u64>().ok());

    let streaming_data = player_response
        .get("streamingData")
        .ok_or_else(|| FetchError::unavailable("no streaming data"))?;

    let mut streams = Vec::new();
    for (key, progressive) in [("formats", true), ("adaptiveFormats", false)] {
        if let Some(formats) = streaming_data.get(key).and_then(Value::as_array) {
            debug!("Found {} {} entries", formats.len(), key);
            streams.extend(
                formats
                    .iter()
                    .filter_map(|format| parse_format(format, progressive, &title)),
            );
        }
    }

    info!("Extracted {} streams for {}", streams.len(), video_id);

    Ok(VideoMetadata {
        id: video_id.to_string(),
        title,
        author,
        duration,
        view_count,
        streams,
    })
}

fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| {
            (
                urlencoding::decode(key).unwrap_or_default().to_string(),
                urlencoding::decode(value).unwrap_or_default().to_string(),
            )
        })
        .collect()
}

/// Direct URL of a format, or `None` when it needs signature deciphering.
fn format_url(format: &Value) -> Option<String> {
    if let Some(url) = format.get("url").and_then(Value::as_str) {
        return Some(url.to_string());
    }

    let cipher = format
        .get("signatureCipher")
        .or_else(|| format.get("cipher"))
        .and_then(Value::as_str)?;
    let params = parse_query_string(cipher);
    if params.contains_key("s") {
        let itag = format.get("itag").cloned().unwrap_or_default();
        debug!("Skipping ciphered format {}", itag);
        return None;
    }
    params.get("url").cloned()
}

fn parse_format(format: &Value, progressive: bool, title: &str) -> Option<StreamDescriptor> {
    let itag = format.get("itag").and_then(Value::as_u64)? as u32;
    let url = format_url(format)?;

    let mime_type = format
        .get("mimeType")
        .and_then(Value::as_str)
        .unwrap_or("video/mp4");
    let essence = mime_type.split(';').next().unwrap_or(mime_type).trim();
    let (kind, container) = essence.split_once('/').unwrap_or(("video", "mp4"));

    let includes_video = progressive || kind == "video";
    let includes_audio = progressive || kind == "audio";

    let resolution = if includes_video {
        format
            .get("height")
            .and_then(Value::as_u64)
            .map(|h| h as u32)
            .or_else(|| {
                format
                    .get("qualityLabel")
                    .and_then(Value::as_str)
                    .and_then(|label| label.split('p').next())
                    .and_then(|digits| digits.parse().ok())
            })
    } else {
        None
    };

    let bitrate = format
        .get("averageBitrate")
        .or_else(|| format.get("bitrate"))
        .and_then(Value::as_u64);

    let abr = if includes_audio && !includes_video {
        bitrate.map(|b| format!("{}kbps", b / 1000))
    } else {
        None
    };

    let filesize = format
        .get("contentLength")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<u64>().ok());

    Some(StreamDescriptor {
        itag,
        url,
        mime_type: essence.to_string(),
        container: container.to_string(),
        is_progressive: progressive,
        includes_video,
        includes_audio,
        resolution,
        abr,
        filesize,
        bitrate,
        default_filename: default_filename(title, container),
    })
}

#[async_trait]
impl Extractor for YouTubeExtractor {
    fn name(&self) -> &'static str {
        "YouTube"
    }

    fn suitable(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com"),
            None => false,
        }
    }

    async fn extract(&self, url: &Url) -> FetchResult<VideoMetadata> {
        let video_id = self.extract_video_id(url).ok_or(FetchError::InvalidUrl)?;
        debug!("Resolved video id {}", video_id);

        let html = self.fetch_watch_page(&video_id).await?;
        let player_response = extract_player_response(&html)?;
        check_playability(&player_response)?;

        metadata_from_player_response(&player_response, &video_id)
    }
}
