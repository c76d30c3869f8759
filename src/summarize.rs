use log::{debug, info};

use crate::error::GenerationError;
use crate::generate::GenerativeModel;
use crate::notify::Notifier;
use crate::retry::{RetryOutcome, RetryPolicy, Sleeper, retry_with_backoff};

pub const DEFAULT_PROMPT: &str = "You are a YouTube video summarizer. You will be taking the transcript text \
and summarizing the entire video and providing the important summary in points within 250 words. \
Please provide the summary of the text given here: ";

#[derive(Debug, PartialEq)]
pub enum SummaryOutcome {
    Summary(String),
    Exhausted { attempts: u32, last_error: GenerationError },
    Fatal(GenerationError),
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&str> {
        match self {
            SummaryOutcome::Summary(s) => Some(s),
            _ => None,
        }
    }
}

/// The prompt is placed directly before the transcript
pub fn build_request(prompt: &str, transcript_text: &str) -> String {
    format!("{prompt}{transcript_text}")
}

/// Summarizes transcripts with a generative model, retrying transient failures
pub struct Summarizer<G, S> {
    model: G,
    sleeper: S,
    policy: RetryPolicy,
    prompt: String,
}

impl<G: GenerativeModel, S: Sleeper> Summarizer<G, S> {
    pub fn new(model: G, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            model,
            sleeper,
            policy,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub async fn summarize(&self, transcript_text: &str, notifier: &impl Notifier) -> SummaryOutcome {
        let request = build_request(&self.prompt, transcript_text);
        debug!("Summary request is {} chars", request.len());

        let model = &self.model;
        let request = request.as_str();

        let outcome = retry_with_backoff(
            &self.policy,
            &self.sleeper,
            || model.generate(request),
            |n| {
                let wait = n.wait.as_secs_f64();
                if n.will_retry() {
                    notifier.warn(&format!(
                        "Attempt {} failed ({}). Retrying in {wait}s, {} retries left...",
                        n.attempt, n.error, n.remaining
                    ));
                } else {
                    notifier.warn(&format!(
                        "Attempt {} failed ({}). Waiting {wait}s before giving up",
                        n.attempt, n.error
                    ));
                }
            },
        )
        .await;

        match outcome {
            RetryOutcome::Success { value, attempts } => {
                info!("Summary generated after {attempts} attempt(s)");
                SummaryOutcome::Summary(value)
            }
            RetryOutcome::Exhausted { attempts, last_error } => {
                notifier.error(&format!(
                    "Failed to generate a summary after {attempts} attempts: {last_error}"
                ));
                SummaryOutcome::Exhausted { attempts, last_error }
            }
            RetryOutcome::Fatal { error, .. } => {
                notifier.error(&format!("Failed to generate a summary: {error}"));
                SummaryOutcome::Fatal(error)
            }
        }
    }
}
