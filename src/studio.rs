//! Per-visitor studio sessions and the registry that owns them.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::constants::PROGRESS_STEPS;
use crate::error::GenerationError;
use crate::fetcher::ImageSource;
use crate::history::{GenerationResult, HistoryLog};
use crate::prompt::{GenerationRequest, compose_prompt};

/// One visitor's working state.
#[derive(Debug, Default)]
pub struct Studio {
    history: HistoryLog,
}

impl Studio {
    /// A studio whose history keeps at most `retain` entries, if set.
    pub fn new(retain: Option<NonZeroUsize>) -> Self {
        Self {
            history: HistoryLog::with_retention(retain),
        }
    }

    /// Read access to the history.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Composes the prompt, fetches it from `source` and records the result.
    pub async fn generate<S: ImageSource + Sync>(
        &mut self,
        request: &GenerationRequest,
        source: &S,
    ) -> Result<&GenerationResult, GenerationError> {
        if !request.api_source().is_wired() {
            debug!(
                "API source {} is not wired, using the default endpoint",
                request.api_source()
            );
        }
        let prompt = compose_prompt(request);
        let image = source.fetch_image(&prompt).await?;
        let result = self.history.record(image, prompt, request.style());
        info!("Beauty Art #{} generated", result.sequence());
        Ok(result)
    }
}

/// Fixed-length pause shown as progress before each fetch. It doesn't track
/// the real request.
#[derive(Clone, Copy, Debug)]
pub struct ProgressPacer {
    step: Duration,
    steps: u32,
}

impl ProgressPacer {
    /// Spreads `total` evenly over the progress steps.
    pub fn new(total: Duration) -> Self {
        Self {
            step: total / PROGRESS_STEPS,
            steps: PROGRESS_STEPS,
        }
    }

    /// Total time a run takes.
    pub fn total(&self) -> Duration {
        self.step * self.steps
    }

    /// Walks the whole schedule.
    pub async fn run(&self) {
        if self.step.is_zero() {
            return;
        }
        for tick in 1..=self.steps {
            tokio::time::sleep(self.step).await;
            if tick % 25 == 0 {
                debug!("progress {}%", tick * 100 / self.steps);
            }
        }
    }
}

#[derive(Debug)]
struct StudioEntry {
    studio: Arc<Mutex<Studio>>,
    last_seen: Instant,
}

/// Creates studios on first use and tears them down on reset or when idle.
#[derive(Debug)]
pub struct StudioRegistry {
    studios: RwLock<HashMap<String, StudioEntry>>,
    idle_timeout: Duration,
    retain: Option<NonZeroUsize>,
}

impl StudioRegistry {
    /// An empty registry.
    pub fn new(idle_timeout: Duration, retain: Option<NonZeroUsize>) -> Self {
        Self {
            studios: RwLock::new(HashMap::new()),
            idle_timeout,
            retain,
        }
    }

    /// The studio for `key`, created if needed. Studios idle past the timeout
    /// are dropped first.
    pub async fn open(&self, key: &str) -> Arc<Mutex<Studio>> {
        let now = Instant::now();
        let mut studios = self.studios.write().await;

        let before = studios.len();
        studios.retain(|other, entry| {
            other == key || now.duration_since(entry.last_seen) <= self.idle_timeout
        });
        if studios.len() < before {
            info!("Dropped {} idle studio(s)", before - studios.len());
        }

        let entry = studios.entry(key.to_string()).or_insert_with(|| {
            debug!("Opening new studio");
            StudioEntry {
                studio: Arc::new(Mutex::new(Studio::new(self.retain))),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        entry.studio.clone()
    }

    /// Tears down the studio for `key`. Returns whether one existed.
    pub async fn close(&self, key: &str) -> bool {
        self.studios.write().await.remove(key).is_some()
    }

    /// Number of live studios.
    pub async fn len(&self) -> usize {
        self.studios.read().await.len()
    }

    /// True when no studio is open.
    pub async fn is_empty(&self) -> bool {
        self.studios.read().await.is_empty()
    }
}
