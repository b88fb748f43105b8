use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub duration: Option<u64>,
    pub view_count: Option<u64>,
    pub streams: Vec<StreamDescriptor>,
}

/// One downloadable variant of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub itag: u32,
    pub url: String,
    pub mime_type: String,
    /// Subtype of the mime type, e.g. `mp4` or `webm`.
    pub container: String,
    pub is_progressive: bool,
    pub includes_video: bool,
    pub includes_audio: bool,
    /// Vertical resolution in pixels.
    pub resolution: Option<u32>,
    pub abr: Option<String>,
    pub filesize: Option<u64>,
    pub bitrate: Option<u64>,
    pub default_filename: String,
}

impl StreamDescriptor {
    pub fn is_audio_only(&self) -> bool {
        self.includes_audio && !self.includes_video
    }

    pub fn is_video_only(&self) -> bool {
        self.includes_video && !self.includes_audio
    }

    pub fn is_adaptive(&self) -> bool {
        !self.is_progressive
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "itag={} mime={}", self.itag, self.mime_type)?;
        if let Some(res) = self.resolution {
            write!(f, " res={}p", res)?;
        }
        if let Some(abr) = &self.abr {
            write!(f, " abr={}", abr)?;
        }
        write!(f, " progressive={}", self.is_progressive)
    }
}

/// What the user asked to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMediaKind(pub String);

impl fmt::Display for InvalidMediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported file type '{}'", self.0)
    }
}

impl std::error::Error for InvalidMediaKind {}

impl FromStr for MediaKind {
    type Err = InvalidMediaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            _ => Err(InvalidMediaKind(s.to_string())),
        }
    }
}
