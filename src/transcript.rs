use std::future::Future;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::link::{VideoId, watch_url};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// A single caption fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl Fragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Caption fragments for one video, in the order the service returned them
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub fragments: Vec<Fragment>,
}

impl Transcript {
    /// Flat transcript text, fragments joined by single spaces
    pub fn text(&self) -> String {
        join_fragments(&self.fragments)
    }
}

pub fn join_fragments(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Source of caption data for a video
pub trait TranscriptFetcher {
    /// Fetch the transcript in the first available language of `languages`
    fn fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> impl Future<Output = Result<Transcript, FetchError>>;
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Fetches captions from YouTube via the InnerTube API
pub struct YouTubeCaptions {
    client: reqwest::Client,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let text = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

impl TranscriptFetcher for YouTubeCaptions {
    async fn fetch(&self, video_id: &VideoId, languages: &[String]) -> Result<Transcript, FetchError> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = watch_url(video_id);
        debug!("Fetching watch page: {watch_url}");
        let page_html = self.get_text(&watch_url).await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");
        let hl = languages.first().map(String::as_str).unwrap_or("en");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": hl,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id.as_str()
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        if let Some(status) = &resp.playability_status {
            if status.status.as_deref().is_some_and(|s| s != "OK") {
                debug!("Video {video_id} not playable: {:?}", status.reason);
                return Err(FetchError::VideoUnavailable(video_id.to_string()));
            }
        }

        let tracks = resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default();

        let track = select_track(&tracks, video_id, languages)?;
        debug!(
            "Using caption track: lang={} generated={}",
            track.language_code,
            track.is_generated()
        );

        // Step 3: Fetch the caption XML
        let caption_xml = self.get_text(&track.base_url).await?;
        let fragments = parse_caption_xml(&caption_xml)?;
        debug!("Parsed {} caption fragments", fragments.len());

        Ok(Transcript {
            video_id: video_id.to_string(),
            language: track.language_code.clone(),
            fragments,
        })
    }
}

/// Pick the track for the most preferred language, manual captions over generated ones
fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    video_id: &VideoId,
    languages: &[String],
) -> Result<&'a CaptionTrack, FetchError> {
    if tracks.is_empty() {
        return Err(FetchError::NoCaptions(video_id.to_string()));
    }

    for lang in languages {
        let mut matching = tracks.iter().filter(|t| &t.language_code == lang);
        let manual = matching.clone().find(|t| !t.is_generated());
        if let Some(track) = manual.or_else(|| matching.next()) {
            return Ok(track);
        }
    }

    Err(FetchError::NoTranscriptFound {
        video_id: video_id.to_string(),
        requested: languages.to_vec(),
        available: tracks.iter().map(|t| t.language_code.clone()).collect(),
    })
}

fn extract_api_key(html: &str) -> Result<String, FetchError> {
    let patterns = [
        r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#,
        r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#,
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).map_err(|e| FetchError::Malformed(e.to_string()))?;
        if let Some(caps) = re.captures(html) {
            return Ok(caps[1].to_string());
        }
    }

    Err(FetchError::Malformed(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Fragment>, FetchError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok(),
                        b"dur" => dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok(),
                        _ => {}
                    }
                }
                current_start = start;
                // Some tracks omit dur on the final fragment
                current_dur = dur.or(Some(0.0));
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        fragments.push(Fragment::new(text, start, dur));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FetchError::Malformed(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(fragments)
}
