use std::fmt;

use crate::error::LinkError;

const MARKER: &str = "v=";

/// Characters that end the identifier inside a link
const DELIMITERS: &[char] = &['&', '#', '?', '/'];

/// A video identifier taken from a link. Only [`extract_video_id`] builds one,
/// so it never carries delimiters that would break URL templating.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video identifier that follows the first `v=` in a link
pub fn extract_video_id(input: &str) -> Result<VideoId, LinkError> {
    let input = input.trim();

    let (_, rest) = input
        .split_once(MARKER)
        .ok_or_else(|| LinkError::MissingMarker(input.to_string()))?;

    let id = rest
        .split(|c: char| DELIMITERS.contains(&c) || c.is_whitespace())
        .next()
        .unwrap_or_default();

    if id.is_empty() {
        return Err(LinkError::EmptyIdentifier(input.to_string()));
    }

    Ok(VideoId(id.to_string()))
}

pub fn thumbnail_url(id: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{id}/0.jpg")
}

pub fn watch_url(id: &VideoId) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

#[cfg(test)]
pub(crate) fn video_id(s: &str) -> VideoId {
    VideoId(s.to_string())
}
