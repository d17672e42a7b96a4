//! Completion hooks for provider batches.
//!
//! Hooks run inside the continuation task, possibly on a runtime worker
//! thread. They must not touch the registry's active set directly; hand the
//! outcome back to the control thread instead (for example through
//! [`ChannelListener`]).

use tokio::sync::mpsc;

use super::error::GeofenceError;

/// One extension point per batch outcome.
///
/// All hooks default to no-ops.
pub trait GeofenceListener: Send + Sync {
    /// The provider accepted an add batch.
    fn on_add_succeeded(&self) {}

    /// The provider rejected an add batch.
    fn on_add_failed(&self, _error: &GeofenceError) {}

    /// The provider accepted a remove batch.
    fn on_remove_succeeded(&self) {}

    /// Remove failure hook.
    ///
    /// With the default configuration this fires with `None` right before
    /// `on_remove_succeeded` when a remove batch is accepted, and never on a
    /// rejection. With `report_remove_failures` enabled it fires only on a
    /// rejection, carrying the error.
    fn on_remove_failed(&self, _error: Option<&GeofenceError>) {}
}

/// Listener that ignores every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl GeofenceListener for NoopListener {}

/// A batch outcome delivered through [`ChannelListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeofenceEvent {
    /// Add batch accepted.
    AddSucceeded,
    /// Add batch rejected, with the error message.
    AddFailed(String),
    /// Remove batch accepted.
    RemoveSucceeded,
    /// Remove failure hook fired, with the error message if there was one.
    RemoveFailed(Option<String>),
}

/// Forwards hook invocations as [`GeofenceEvent`]s over an unbounded channel.
///
/// # Example
///
/// ```
/// use geofence_core::geofence::{ChannelListener, GeofenceEvent, GeofenceListener};
///
/// let (listener, mut events) = ChannelListener::new();
/// listener.on_add_succeeded();
/// assert_eq!(events.try_recv().unwrap(), GeofenceEvent::AddSucceeded);
/// ```
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<GeofenceEvent>,
}

impl ChannelListener {
    /// Creates a listener and the receiver for its events.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GeofenceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: GeofenceEvent) {
        // Receiver dropped; nobody is listening anymore.
        let _ = self.tx.send(event);
    }
}

impl GeofenceListener for ChannelListener {
    fn on_add_succeeded(&self) {
        self.emit(GeofenceEvent::AddSucceeded);
    }

    fn on_add_failed(&self, error: &GeofenceError) {
        self.emit(GeofenceEvent::AddFailed(error.to_string()));
    }

    fn on_remove_succeeded(&self) {
        self.emit(GeofenceEvent::RemoveSucceeded);
    }

    fn on_remove_failed(&self, error: Option<&GeofenceError>) {
        self.emit(GeofenceEvent::RemoveFailed(error.map(ToString::to_string)));
    }
}
