//! Status polling with result retries

use std::time::Duration;
use tokio::time::{sleep, timeout};

use super::client::Client;
use super::is_terminal_status;
use super::transport::Transport;
use crate::error::{require, Result, SdkError};
use crate::types::TaskResult;

const DEFAULT_MAX_TRIES: u32 = 5;
const DEFAULT_SLEEP: Duration = Duration::from_secs(10);
const MAX_SLEEP: Duration = Duration::from_secs(60);

/// Retry settings for fetching the result of a finished task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Result fetch attempts; `0` means the default of 5
    pub max_tries: u32,
    /// Fixed delay between attempts; zero means 10 s, capped at 60 s
    pub sleep: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_tries: DEFAULT_MAX_TRIES,
            sleep: DEFAULT_SLEEP,
        }
    }
}

impl PollOptions {
    pub fn new(max_tries: u32, sleep: Duration) -> Self {
        Self { max_tries, sleep }
    }

    pub fn effective_max_tries(&self) -> u32 {
        if self.max_tries == 0 {
            DEFAULT_MAX_TRIES
        } else {
            self.max_tries
        }
    }

    pub fn effective_sleep(&self) -> Duration {
        if self.sleep.is_zero() {
            DEFAULT_SLEEP
        } else {
            self.sleep.min(MAX_SLEEP)
        }
    }
}

/// Status of a task plus its result once the task is terminal
#[derive(Debug)]
pub struct StatusAndResult {
    /// Raw status reported by the service
    pub status: String,
    /// Result of the first successful fetch, if any
    pub result: Option<TaskResult>,
    /// Result fetches performed
    pub attempts: u32,
    /// Error of the last failed fetch when every attempt failed
    pub last_error: Option<SdkError>,
}

impl StatusAndResult {
    /// `true` when the task was terminal but no fetch succeeded
    pub fn is_exhausted(&self) -> bool {
        self.result.is_none() && self.last_error.is_some()
    }
}

impl<T: Transport> Client<T> {
    /// Fetches the status of a task and, once it is terminal, its result.
    ///
    /// Non-terminal statuses return straight away. For `SUCCESS` and
    /// `FAILED` the result is fetched up to `max_tries` times with a fixed
    /// sleep between attempts. When every attempt fails this still returns
    /// `Ok`; inspect [`StatusAndResult::last_error`].
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use runninghub_rust_sdk::prelude::*;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(ClientConfig::new("my-api-key"))?;
    /// let polled = client.task_status_and_result("1910246754753896450", PollOptions::default()).await?;
    /// if let Some(TaskResult::Success(outputs)) = &polled.result {
    ///     for output in outputs {
    ///         println!("{}", output.file_url);
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn task_status_and_result(
        &self,
        task_id: &str,
        options: PollOptions,
    ) -> Result<StatusAndResult> {
        require("task_id", task_id)?;
        let status = self.task_status(task_id).await?;
        let mut polled = StatusAndResult {
            status,
            result: None,
            attempts: 0,
            last_error: None,
        };
        if !is_terminal_status(&polled.status) {
            return Ok(polled);
        }

        let max_tries = options.effective_max_tries();
        let delay = options.effective_sleep();
        for attempt in 1..=max_tries {
            polled.attempts = attempt;
            match self.task_result(task_id).await {
                Ok(result) => {
                    polled.result = Some(result);
                    polled.last_error = None;
                    return Ok(polled);
                }
                Err(e) => {
                    log::warn!(
                        "fetching result of task {} failed (attempt {}/{}): {}",
                        task_id,
                        attempt,
                        max_tries,
                        e
                    );
                    polled.last_error = Some(e);
                    if attempt < max_tries {
                        sleep(delay).await;
                    }
                }
            }
        }

        log::warn!("giving up on result of task {} after {} attempts", task_id, max_tries);
        Ok(polled)
    }

    /// Polls a task until it is terminal and returns its result.
    ///
    /// The status is re-checked every `options.sleep`; `timeout_duration`
    /// bounds the whole wait.
    pub async fn wait_for_result(
        &self,
        task_id: &str,
        options: PollOptions,
        timeout_duration: Duration,
    ) -> Result<TaskResult> {
        timeout(timeout_duration, self.poll_until_terminal(task_id, options))
            .await
            .map_err(|_| SdkError::Timeout)?
    }

    async fn poll_until_terminal(&self, task_id: &str, options: PollOptions) -> Result<TaskResult> {
        loop {
            let polled = self.task_status_and_result(task_id, options).await?;
            if let Some(result) = polled.result {
                return Ok(result);
            }
            if let Some(e) = polled.last_error {
                return Err(e);
            }
            log::debug!("task {} is {}, waiting", task_id, polled.status);
            sleep(options.effective_sleep()).await;
        }
    }
}
