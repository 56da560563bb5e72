//! Handles to spawned API calls

use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::request::RequestSpec;

/// A call running in the background.
///
/// Keeps a copy of the request it was started with so results can be matched
/// back to their inputs after `join`.
pub struct RequestHandle<T> {
    args: RequestSpec,
    handle: JoinHandle<Result<T>>,
}

impl<T> RequestHandle<T> {
    pub(crate) fn new(args: RequestSpec, handle: JoinHandle<Result<T>>) -> Self {
        Self { args, handle }
    }

    pub fn args(&self) -> &RequestSpec {
        &self.args
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the call and return its result.
    pub async fn join(self) -> Result<T> {
        self.handle
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}
