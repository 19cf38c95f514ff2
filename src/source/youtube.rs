use crate::config::ClientConfig;
use crate::error::{Result, YtsrtError};
use crate::source::{extract_video_id, CaptionSource, CaptionTrack};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default InnerTube host.
const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Player endpoint, relative to the base URL.
const PLAYER_PATH: &str = "/youtubei/v1/player?prettyPrint=false";

/// Timed-text format understood by the caption parser.
const CAPTION_FORMAT: &str = "srv3";

/// YouTube InnerTube client for caption track listing and download.
pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    client_config: ClientConfig,
}

impl YouTubeClient {
    /// Create a client that identifies itself with `client_config`.
    pub fn new(client_config: ClientConfig, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-us,en"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: YOUTUBE_BASE_URL.to_string(),
            client_config,
        })
    }

    /// Point the player endpoint at another host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(&self, video_id: &str) -> PlayerRequest {
        PlayerRequest {
            context: RequestContext {
                client: ClientInfo {
                    client_name: self.client_config.profile.client_name().to_string(),
                    client_version: self.client_config.effective_version().to_string(),
                    hl: self.client_config.hl.clone(),
                },
            },
            video_id: video_id.to_string(),
        }
    }

    async fn call_player(&self, video_id: &str) -> Result<PlayerResponse> {
        let request = self.build_request(video_id);
        debug!(
            "Requesting player data for {} as {} {}",
            video_id, request.context.client.client_name, request.context.client.client_version
        );

        let response = self
            .client
            .post(format!("{}{}", self.base_url, PLAYER_PATH))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Player API response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(YtsrtError::Api(format!(
                "YouTube player API error ({}): {}",
                status,
                preview(&body)
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CaptionSource for YouTubeClient {
    async fn list_available_captions(&self, video: &str) -> Result<Vec<CaptionTrack>> {
        let video_id = extract_video_id(video);
        let response = self.call_player(&video_id).await?;

        let tracks = match response.captions {
            Some(captions) => captions.player_captions_tracklist_renderer.caption_tracks,
            None => {
                let status = response.playability_status.unwrap_or_default();
                if status.status.as_deref().is_some_and(|s| s != "OK") {
                    return Err(YtsrtError::Api(format!(
                        "Video {} is not playable ({}): {}",
                        video_id,
                        status.status.unwrap_or_default(),
                        status.reason.unwrap_or_else(|| "no reason given".to_string())
                    )));
                }
                warn!("Video {} has no captions", video_id);
                Vec::new()
            }
        };

        Ok(tracks.into_iter().map(CaptionTrack::from).collect())
    }

    async fn download_track(&self, track: &CaptionTrack) -> Result<String> {
        let url = caption_url(&track.url)?;
        debug!("Downloading {} captions from {}", track.code, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(YtsrtError::Api(format!(
                "Caption download for '{}' failed ({}): {}",
                track.code,
                status,
                preview(&body)
            )));
        }

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "YouTube"
    }
}

fn preview(body: &str) -> String {
    body.chars().take(500).collect()
}

/// Force the track URL to return srv3 timed text.
fn caption_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| YtsrtError::Api(format!("Invalid caption URL {}: {}", base_url, e)))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", CAPTION_FORMAT);

    Ok(url)
}

// Request types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRequest {
    context: RequestContext,
    video_id: String,
}

#[derive(Debug, Serialize)]
struct RequestContext {
    client: ClientInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_name: String,
    client_version: String,
    hl: String,
}

// Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: TracklistRenderer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<ApiCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCaptionTrack {
    base_url: String,
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(self) -> Option<String> {
        self.simple_text.or_else(|| {
            self.runs
                .map(|runs| runs.into_iter().map(|r| r.text).collect::<String>())
        })
    }
}

impl From<ApiCaptionTrack> for CaptionTrack {
    fn from(track: ApiCaptionTrack) -> Self {
        // Auto-generated tracks use the `a.` prefix, like the vssId field.
        let code = match track.kind.as_deref() {
            Some("asr") => format!("a.{}", track.language_code),
            _ => track.language_code.clone(),
        };
        let name = track
            .name
            .and_then(TrackName::text)
            .unwrap_or_else(|| track.language_code.clone());

        CaptionTrack {
            code,
            name,
            url: track.base_url,
        }
    }
}
