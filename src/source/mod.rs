pub mod youtube;

pub use youtube::YouTubeClient;

use crate::error::{Result, YtsrtError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// A caption track offered for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Language code, e.g. `en` or `a.en` for auto-generated tracks.
    pub code: String,
    /// Human readable name, e.g. `English (auto-generated)`.
    pub name: String,
    pub url: String,
}

/// Something that can list and download caption tracks for a video.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// List the caption tracks available for a video, in platform order.
    async fn list_available_captions(&self, video: &str) -> Result<Vec<CaptionTrack>>;

    /// Download the raw timed-text XML of a track.
    async fn download_track(&self, track: &CaptionTrack) -> Result<String>;

    fn name(&self) -> &'static str;

    /// Fetch the raw XML of the track matching `language`, or of the first
    /// track when no language is given.
    async fn fetch_caption_track(&self, video: &str, language: Option<&str>) -> Result<String> {
        let tracks = self.list_available_captions(video).await?;
        let track = select_track(&tracks, language, video)?;
        self.download_track(track).await
    }
}

/// Pick the track for `language`, or the first one when `language` is `None`.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    language: Option<&str>,
    video: &str,
) -> Result<&'a CaptionTrack> {
    match language {
        Some(code) => tracks
            .iter()
            .find(|t| t.code == code)
            .ok_or_else(|| YtsrtError::CaptionNotFound(code.to_string())),
        None => tracks
            .first()
            .ok_or_else(|| YtsrtError::NoCaptionTracks(video.to_string())),
    }
}

/// Pull the video id out of a watch, short, embed or shorts URL.
///
/// Input that doesn't look like a URL is returned unchanged and treated as
/// an id.
pub fn extract_video_id(input: &str) -> String {
    static VIDEO_ID: OnceLock<Regex> = OnceLock::new();
    let re = VIDEO_ID.get_or_init(|| {
        Regex::new(r"(?:v=|/v/|youtu\.be/|/embed/|/shorts/|/live/)([A-Za-z0-9_-]+)")
            .expect("Invalid regex")
    });

    let id = re
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| input.trim().to_string());

    debug!("Resolved video id {} from {}", id, input);
    id
}
