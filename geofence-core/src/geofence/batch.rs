//! Handles for in-flight provider batches.

use tokio::task::JoinHandle;

use super::error::GeofenceError;

/// Kind of provider batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOperation {
    /// Add batch submitted by `register`.
    Add,
    /// Remove batch submitted by `invalidate`.
    Remove,
}

/// Final state of a batch.
#[derive(Debug)]
pub enum BatchOutcome {
    /// The provider accepted the whole batch.
    Accepted,
    /// The provider rejected the batch, or its task failed.
    Rejected(GeofenceError),
    /// Nothing to submit; the provider was never called.
    Skipped,
}

impl BatchOutcome {
    /// Returns true if the provider accepted the batch.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the rejection error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&GeofenceError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// A batch returned by `register`/`invalidate`.
///
/// The request IDs are a snapshot taken when the batch was built. Dropping
/// the handle does not cancel the batch; the listener hooks still fire.
#[derive(Debug)]
pub struct BatchHandle {
    operation: BatchOperation,
    request_ids: Vec<String>,
    task: Option<JoinHandle<BatchOutcome>>,
}

impl BatchHandle {
    pub(crate) const fn submitted(
        operation: BatchOperation,
        request_ids: Vec<String>,
        task: JoinHandle<BatchOutcome>,
    ) -> Self {
        Self {
            operation,
            request_ids,
            task: Some(task),
        }
    }

    pub(crate) const fn skipped(operation: BatchOperation) -> Self {
        Self {
            operation,
            request_ids: Vec::new(),
            task: None,
        }
    }

    /// Add or remove.
    #[must_use]
    pub const fn operation(&self) -> BatchOperation {
        self.operation
    }

    /// Request IDs carried by the batch, in submission order.
    #[must_use]
    pub fn request_ids(&self) -> &[String] {
        &self.request_ids
    }

    /// Returns true if the batch reached the provider.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.task.is_some()
    }

    /// Waits for the provider to report on the batch.
    ///
    /// Listener hooks have already run by the time this resolves.
    pub async fn outcome(self) -> BatchOutcome {
        match self.task {
            None => BatchOutcome::Skipped,
            Some(task) => task
                .await
                .unwrap_or_else(|e| BatchOutcome::Rejected(GeofenceError::TaskFailed(e.to_string()))),
        }
    }
}
