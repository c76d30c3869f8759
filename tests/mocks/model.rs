use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ytnotes::{GenerationError, GenerativeModel};

/// Replies with a scripted sequence of results, one per call
#[derive(Clone)]
pub struct MockModel {
    pub replies: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    pub fn scripted(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn answering(summary: &str) -> Self {
        Self::scripted(vec![Ok(summary.to_string())])
    }
}

impl GenerativeModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::fatal("MOCK", "no scripted reply left")))
    }
}
