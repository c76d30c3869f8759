use std::sync::{Arc, Mutex};

use ytnotes::{FetchError, Fragment, Transcript, TranscriptFetcher, VideoId};

#[derive(Clone)]
pub struct MockFetcher {
    pub fragments: Vec<String>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub fail_with: Option<FetchError>,
}

impl MockFetcher {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            fragments: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(err),
        }
    }
}

impl TranscriptFetcher for MockFetcher {
    async fn fetch(&self, video_id: &VideoId, languages: &[String]) -> Result<Transcript, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));
        if let Some(ref err) = self.fail_with {
            return Err(err.clone());
        }
        Ok(Transcript {
            video_id: video_id.to_string(),
            language: languages.first().cloned().unwrap_or_default(),
            fragments: self
                .fragments
                .iter()
                .enumerate()
                .map(|(i, text)| Fragment::new(text.clone(), i as f64, 1.0))
                .collect(),
        })
    }
}
