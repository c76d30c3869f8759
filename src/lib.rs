pub mod config;
pub mod error;
pub mod generate;
pub mod link;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod session;
pub mod summarize;
pub mod transcript;

pub use error::{ConfigError, FetchError, GenerationError, LinkError};
pub use generate::{GeminiClient, GenerativeModel};
pub use link::{VideoId, extract_video_id, thumbnail_url};
pub use notify::Notifier;
pub use pipeline::{Notes, Outcome, Pipeline, Preview};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use summarize::{SummaryOutcome, Summarizer};
pub use transcript::{Fragment, Transcript, TranscriptFetcher, YouTubeCaptions};
