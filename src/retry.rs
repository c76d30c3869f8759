//! Bounded exponential backoff for transient generation failures.
//!
//! [`Backoff`] is the pure state machine; [`retry_with_backoff`] drives it
//! against an async operation and a [`Sleeper`].

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::error::GenerationError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Transient failures tolerated before giving up
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempt,
    RetryWait,
    Success,
    Exhausted,
    FatalError,
}

/// What the driver must do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep for `wait`, then continue in `next` (`Attempt` or `Exhausted`)
    Wait { wait: Duration, next: RetryState },
    /// Stop without waiting
    Fatal,
}

#[derive(Debug, Clone)]
pub struct Backoff {
    state: RetryState,
    budget: u32,
    delay: Duration,
    attempts: u32,
}

impl Backoff {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            state: RetryState::Attempt,
            budget: policy.max_retries,
            delay: policy.initial_delay,
            attempts: 0,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record the start of an attempt. Returns false once the machine is terminal.
    pub fn begin_attempt(&mut self) -> bool {
        if self.state != RetryState::Attempt {
            return false;
        }
        self.attempts += 1;
        true
    }

    pub fn on_success(&mut self) {
        self.state = RetryState::Success;
    }

    /// Transient: wait the current delay, double it, spend one unit of budget,
    /// then attempt again while budget remains. Anything else is fatal.
    pub fn on_failure(&mut self, err: &GenerationError) -> Step {
        if !err.is_transient() {
            self.state = RetryState::FatalError;
            return Step::Fatal;
        }

        self.state = RetryState::RetryWait;
        let wait = self.delay;
        self.delay = self.delay.saturating_mul(2);
        self.budget = self.budget.saturating_sub(1);
        self.state = if self.budget > 0 {
            RetryState::Attempt
        } else {
            RetryState::Exhausted
        };

        Step::Wait { wait, next: self.state }
    }
}

/// Blocking pause between attempts
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Passed to the observer before each backoff wait
#[derive(Debug)]
pub struct RetryNotice<'a> {
    pub attempt: u32,
    pub wait: Duration,
    pub remaining: u32,
    /// `Attempt` if another try follows the wait, `Exhausted` if not
    pub next: RetryState,
    pub error: &'a GenerationError,
}

impl RetryNotice<'_> {
    pub fn will_retry(&self) -> bool {
        self.next == RetryState::Attempt
    }
}

#[derive(Debug, PartialEq)]
pub enum RetryOutcome<T> {
    Success { value: T, attempts: u32 },
    Exhausted { attempts: u32, last_error: GenerationError },
    Fatal { attempts: u32, error: GenerationError },
}

/// Run `operation` until it succeeds, fails fatally, or the budget runs out
pub async fn retry_with_backoff<T, F, Fut, S, N>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut operation: F,
    mut on_retry: N,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
    S: Sleeper,
    N: FnMut(&RetryNotice<'_>),
{
    let mut backoff = Backoff::new(policy);

    loop {
        let started = backoff.begin_attempt();
        debug_assert!(started, "attempt started in terminal state {:?}", backoff.state());
        let attempt = backoff.attempts();

        let err = match operation().await {
            Ok(value) => {
                backoff.on_success();
                return RetryOutcome::Success { value, attempts: attempt };
            }
            Err(e) => e,
        };

        match backoff.on_failure(&err) {
            Step::Fatal => {
                debug!("Attempt {attempt} failed fatally: {err}");
                return RetryOutcome::Fatal { attempts: attempt, error: err };
            }
            Step::Wait { wait, next } => {
                debug!("Attempt {attempt} failed: {err}, waiting {wait:?}");
                on_retry(&RetryNotice {
                    attempt,
                    wait,
                    remaining: backoff.budget(),
                    next,
                    error: &err,
                });
                sleeper.sleep(wait).await;
                if next == RetryState::Exhausted {
                    return RetryOutcome::Exhausted {
                        attempts: attempt,
                        last_error: err,
                    };
                }
            }
        }
    }
}
