use std::sync::{Arc, Mutex};
use std::time::Duration;

use ytnotes::Sleeper;

/// Records requested waits instead of sleeping
#[derive(Clone, Default)]
pub struct MockSleeper {
    pub waits: Arc<Mutex<Vec<Duration>>>,
}

impl Sleeper for MockSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}
