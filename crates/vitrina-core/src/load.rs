//! Asset load task with timeout and cancellation
//!
//! The engine loads the asset on its own task pool; this type only tracks the
//! request. It is polled once per frame with the engine's current status and
//! resolves exactly once: a single `Ready` (the asset can be spawned), and later
//! a single `Failed` if anything goes wrong before `finish` is called.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::framing::FramingError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("failed to fetch or parse asset: {0}")]
    Fetch(String),
    #[error("asset contains no scene")]
    MissingScene,
    #[error("asset contains no mesh geometry")]
    EmptyGeometry,
    #[error("cannot frame asset: {0}")]
    Framing(#[from] FramingError),
    #[error("asset did not load within {0:?}")]
    TimedOut(Duration),
    #[error("asset load was cancelled")]
    Cancelled,
}

/// Engine-reported status of the underlying asset request
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(String),
}

/// Result of one poll
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPoll {
    /// Still waiting
    Pending,
    /// Asset bytes are in; spawn it. Returned once.
    Ready,
    /// Terminal failure. Returned once.
    Failed(LoadError),
    /// Task already resolved; nothing new to report
    Settled,
}

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Requested,
    Fetched,
    Finished,
}

#[derive(Debug, Clone)]
pub struct AssetLoadTask {
    path: String,
    timeout: Option<Duration>,
    token: CancellationToken,
    state: TaskState,
}

impl AssetLoadTask {
    /// `timeout` of `None` waits forever
    pub fn new(path: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            path: path.into(),
            timeout,
            token: CancellationToken::new(),
            state: TaskState::Requested,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.state == TaskState::Finished
    }

    /// Advance the task. `elapsed` is measured from when the request was issued.
    pub fn poll(&mut self, elapsed: Duration, status: LoadStatus) -> LoadPoll {
        if self.state == TaskState::Finished {
            return LoadPoll::Settled;
        }

        if self.token.is_cancelled() {
            tracing::debug!("Load of {} cancelled", self.path);
            self.state = TaskState::Finished;
            return LoadPoll::Failed(LoadError::Cancelled);
        }

        if self.state == TaskState::Requested {
            match status {
                LoadStatus::Failed(reason) => {
                    self.state = TaskState::Finished;
                    return LoadPoll::Failed(LoadError::Fetch(reason));
                }
                LoadStatus::Loaded => {
                    self.state = TaskState::Fetched;
                    return LoadPoll::Ready;
                }
                LoadStatus::Pending => {}
            }
        }

        match self.timeout {
            Some(limit) if elapsed >= limit => {
                tracing::debug!("Load of {} timed out after {:?}", self.path, elapsed);
                self.state = TaskState::Finished;
                LoadPoll::Failed(LoadError::TimedOut(limit))
            }
            _ => LoadPoll::Pending,
        }
    }

    /// Mark the asset as fully placed; later polls are `Settled`
    pub fn finish(&mut self) {
        self.state = TaskState::Finished;
    }

    /// Fail the task from outside (e.g. the asset turned out to be empty).
    /// Returns the error only if the task had not already resolved.
    pub fn abort(&mut self, error: LoadError) -> Option<LoadError> {
        if self.state == TaskState::Finished {
            return None;
        }
        self.state = TaskState::Finished;
        Some(error)
    }
}

/// Turn a page-relative path into an asset-server path. Absolute URLs pass through.
pub fn normalize_asset_path(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    path.trim_start_matches('/').to_string()
}
