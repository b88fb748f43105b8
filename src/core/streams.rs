use crate::core::{MediaKind, StreamDescriptor};

/// Chainable filter over the streams of one video.
#[derive(Debug, Clone)]
pub struct StreamQuery<'a> {
    streams: Vec<&'a StreamDescriptor>,
}

impl<'a> StreamQuery<'a> {
    pub fn new(streams: &'a [StreamDescriptor]) -> Self {
        Self {
            streams: streams.iter().collect(),
        }
    }

    fn retain(mut self, keep: impl Fn(&StreamDescriptor) -> bool) -> Self {
        self.streams.retain(|s| keep(s));
        self
    }

    pub fn progressive(self) -> Self {
        self.retain(|s| s.is_progressive)
    }

    pub fn adaptive(self) -> Self {
        self.retain(|s| s.is_adaptive())
    }

    pub fn only_audio(self) -> Self {
        self.retain(|s| s.is_audio_only())
    }

    pub fn only_video(self) -> Self {
        self.retain(|s| s.is_video_only())
    }

    pub fn file_extension(self, ext: &str) -> Self {
        self.retain(|s| s.container.eq_ignore_ascii_case(ext))
    }

    /// Ascending; streams without a resolution come first.
    pub fn order_by_resolution(mut self) -> Self {
        self.streams.sort_by_key(|s| s.resolution);
        self
    }

    pub fn desc(mut self) -> Self {
        self.streams.reverse();
        self
    }

    pub fn first(&self) -> Option<&'a StreamDescriptor> {
        self.streams.first().copied()
    }

    pub fn last(&self) -> Option<&'a StreamDescriptor> {
        self.streams.last().copied()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a StreamDescriptor> + '_ {
        self.streams.iter().copied()
    }

    pub fn get_by_itag(&self, itag: u32) -> Option<&'a StreamDescriptor> {
        self.iter().find(|s| s.itag == itag)
    }

    /// Highest resolution progressive mp4.
    pub fn get_highest_resolution(&self) -> Option<&'a StreamDescriptor> {
        self.clone()
            .progressive()
            .file_extension("mp4")
            .order_by_resolution()
            .desc()
            .first()
    }

    /// First audio-only stream, in listing order.
    pub fn get_audio_only(&self) -> Option<&'a StreamDescriptor> {
        self.clone().only_audio().first()
    }
}

/// Picks the stream to download for `kind`, if any qualifies.
pub fn select_stream(streams: &[StreamDescriptor], kind: MediaKind) -> Option<&StreamDescriptor> {
    let query = StreamQuery::new(streams);
    match kind {
        MediaKind::Video => query.get_highest_resolution(),
        MediaKind::Audio => query.get_audio_only(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn stream(
        itag: u32,
        mime: &str,
        progressive: bool,
        resolution: Option<u32>,
    ) -> StreamDescriptor {
        let (kind, container) = mime.split_once('/').unwrap();
        let includes_video = progressive || kind == "video";
        let includes_audio = progressive || kind == "audio";
        StreamDescriptor {
            itag,
            url: format!("https://example.com/{}", itag),
            mime_type: mime.to_string(),
            container: container.to_string(),
            is_progressive: progressive,
            includes_video,
            includes_audio,
            resolution,
            abr: includes_audio.then(|| "128kbps".to_string()),
            filesize: Some(1024),
            bitrate: None,
            default_filename: format!("clip.{}", container),
        }
    }

    fn catalog() -> Vec<StreamDescriptor> {
        vec![
            stream(18, "video/mp4", true, Some(360)),
            stream(22, "video/mp4", true, Some(720)),
            stream(43, "video/webm", true, Some(1080)),
            stream(137, "video/mp4", false, Some(1080)),
            stream(251, "audio/webm", false, None),
            stream(140, "audio/mp4", false, None),
        ]
    }

    #[test]
    fn video_picks_highest_progressive_mp4() {
        let streams = catalog();
        let chosen = select_stream(&streams, MediaKind::Video).unwrap();
        assert_eq!(chosen.itag, 22);

        let candidates = StreamQuery::new(&streams).progressive().file_extension("mp4");
        for other in candidates.iter() {
            assert!(chosen.resolution >= other.resolution);
        }
    }

    #[test]
    fn audio_picks_first_audio_only() {
        let streams = catalog();
        let chosen = select_stream(&streams, MediaKind::Audio).unwrap();
        assert_eq!(chosen.itag, 251);
        assert!(chosen.is_audio_only());
    }

    #[test]
    fn no_candidates_yields_none() {
        let video_only = vec![stream(137, "video/mp4", false, Some(1080))];
        assert!(select_stream(&video_only, MediaKind::Audio).is_none());
        assert!(select_stream(&video_only, MediaKind::Video).is_none());
        assert!(select_stream(&[], MediaKind::Video).is_none());
    }

    #[test]
    fn query_filters_chain() {
        let streams = catalog();
        let query = StreamQuery::new(&streams);
        assert_eq!(query.clone().adaptive().len(), 3);
        assert_eq!(query.clone().only_video().len(), 1);
        assert_eq!(query.clone().file_extension("WEBM").len(), 2);
        assert_eq!(query.get_by_itag(140).map(|s| s.itag), Some(140));
        assert!(query.clone().only_audio().progressive().is_empty());

        let ascending = query.clone().progressive().order_by_resolution();
        assert_eq!(ascending.first().unwrap().itag, 18);
        assert_eq!(ascending.last().unwrap().itag, 43);
    }
}
