//! Retry sequence for one covered chunk load.

use std::time::Duration;

use crate::chunk::ChunkId;
use crate::error::{ChunkLoadError, HostError};
use crate::fallback;
use crate::host::ChunkHost;

use super::ChunkLoader;

/// Where a retry sequence stands between settles.
#[derive(Debug)]
enum Step {
    Attempting,
    Waiting {
        attempt: u32,
        remaining: u32,
        delay: Duration,
    },
    Succeeded,
    Exhausted(ChunkLoadError),
}

impl<H: ChunkHost> ChunkLoader<H> {
    pub(super) async fn run(&self, id: &ChunkId) -> Result<(), ChunkLoadError> {
        let mut step = Step::Attempting;
        loop {
            step = match step {
                Step::Attempting => {
                    let url = self.chunk_url(id);
                    match self.host.ensure_chunk(id, &url).await {
                        Ok(()) => Step::Succeeded,
                        Err(e) => self.on_failure(id, e),
                    }
                }
                Step::Waiting {
                    attempt,
                    remaining,
                    delay,
                } => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let query = self.options.retry_query(attempt);
                    self.book().record_retry(id, query, remaining - 1);
                    Step::Attempting
                }
                Step::Succeeded => return Ok(()),
                Step::Exhausted(err) => return Err(err),
            };
        }
    }

    fn on_failure(&self, id: &ChunkId, error: HostError) -> Step {
        let max = self.options.max_retries();
        let remaining = self.remaining_retries(id).unwrap_or(max);

        if remaining < 1 {
            let err = ChunkLoadError::Exhausted {
                chunk_id: id.clone(),
                request: self.host.chunk_script_filename(id),
                max_retries: max,
                source: error,
            };
            tracing::error!(chunk = %id, "{}", err);
            if let Some(hook) = &self.options.last_resort {
                hook(&err);
            }
            return Step::Exhausted(err);
        }

        fallback::apply(
            &self.page.env,
            self.page.document.as_ref(),
            self.page.storage.as_ref(),
            &self.options.cdn_host,
        );

        let attempt = max - remaining + 1;
        let delay = self.options.retry_delay.delay_for(attempt);
        tracing::warn!(
            chunk = %id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "chunk load failed, retrying: {}",
            error
        );
        Step::Waiting {
            attempt,
            remaining,
            delay,
        }
    }
}
