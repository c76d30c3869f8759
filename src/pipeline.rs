//! One interaction: link → transcript → summary.
//!
//! Nothing is kept between calls; every failure is reported through the
//! [`Notifier`] before the outcome is returned.

use log::{debug, info};
use serde::Serialize;

use crate::error::{FetchError, LinkError};
use crate::generate::GenerativeModel;
use crate::link::{self, VideoId};
use crate::notify::Notifier;
use crate::retry::Sleeper;
use crate::summarize::{SummaryOutcome, Summarizer};
use crate::transcript::TranscriptFetcher;

pub const DEFAULT_LANGUAGES: &[&str] = &["en", "en-US", "en-GB"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    #[serde(serialize_with = "serialize_video_id")]
    pub video_id: VideoId,
    pub thumbnail_url: String,
}

impl Preview {
    pub fn new(video_id: VideoId) -> Self {
        let thumbnail_url = link::thumbnail_url(&video_id);
        Self { video_id, thumbnail_url }
    }
}

fn serialize_video_id<S: serde::Serializer>(id: &VideoId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notes {
    #[serde(flatten)]
    pub preview: Preview,
    pub language: String,
    pub summary: String,
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Notes(Notes),
    InvalidLink(LinkError),
    FetchFailed(FetchError),
    EmptyTranscript(Preview),
    SummaryFailed(SummaryOutcome),
}

impl Outcome {
    pub fn notes(&self) -> Option<&Notes> {
        match self {
            Outcome::Notes(n) => Some(n),
            _ => None,
        }
    }
}

/// Parse a link for display; a bad link is a warning, not a failure
pub fn preview(url: &str, notifier: &impl Notifier) -> Option<Preview> {
    match link::extract_video_id(url) {
        Ok(id) => Some(Preview::new(id)),
        Err(e) => {
            notifier.warn(&format!("{e}. Expected a link like https://www.youtube.com/watch?v=<id>"));
            None
        }
    }
}

pub struct Pipeline<F, G, S> {
    fetcher: F,
    summarizer: Summarizer<G, S>,
    languages: Vec<String>,
}

impl<F, G, S> Pipeline<F, G, S>
where
    F: TranscriptFetcher,
    G: GenerativeModel,
    S: Sleeper,
{
    pub fn new(fetcher: F, summarizer: Summarizer<G, S>, languages: Vec<String>) -> Self {
        Self {
            fetcher,
            summarizer,
            languages,
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub async fn run(&self, url: &str, notifier: &impl Notifier) -> Outcome {
        let preview = match link::extract_video_id(url) {
            Ok(id) => Preview::new(id),
            Err(e) => {
                notifier.warn(&format!("{e}. Nothing to summarize."));
                return Outcome::InvalidLink(e);
            }
        };

        info!("Running pipeline for video {}", preview.video_id);
        notifier.info("Fetching transcript...");

        let transcript = match self.fetcher.fetch(&preview.video_id, &self.languages).await {
            Ok(t) => t,
            Err(e) => {
                notifier.error(&format!("Could not fetch the transcript: {e}"));
                return Outcome::FetchFailed(e);
            }
        };

        let text = transcript.text();
        debug!(
            "Transcript: lang={} fragments={} chars={}",
            transcript.language,
            transcript.fragments.len(),
            text.len()
        );

        if text.trim().is_empty() {
            notifier.warn(&format!("The transcript for {} is empty. Nothing to summarize.", preview.video_id));
            return Outcome::EmptyTranscript(preview);
        }

        notifier.info("Generating notes...");
        match self.summarizer.summarize(&text, notifier).await {
            SummaryOutcome::Summary(summary) => Outcome::Notes(Notes {
                preview,
                language: transcript.language,
                summary,
            }),
            failed => Outcome::SummaryFailed(failed),
        }
    }
}
