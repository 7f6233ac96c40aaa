use std::future::Future;

use tokio::task::{JoinError, JoinHandle};
use tracing::{error, warn};

use crate::host::HostError;

/// Work the host must keep the background context alive for.
///
/// The handler has no way to cancel it. Only the host can, through [`Lifetime::terminate`].
#[must_use = "the host must settle or terminate the lifetime"]
pub struct Lifetime {
    label: &'static str,
    handle: JoinHandle<Result<(), HostError>>,
}

impl Lifetime {
    /// Spawns on the current tokio runtime.
    pub fn extend<F>(label: &'static str, work: F) -> Self
    where
        F: Future<Output = Result<(), HostError>> + Send + 'static,
    {
        Self {
            label,
            handle: tokio::spawn(work),
        }
    }

    /// The event the work belongs to, e.g. `push`.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Waits for the work to finish. Failures are logged here, since nothing
    /// upstream of a background handler can report them.
    pub async fn settle(self) -> Result<(), HostError> {
        let result = self.handle.await.unwrap_or_else(|e| Err(join_failure(e)));

        match &result {
            Err(e @ HostError::Terminated) => warn!("{} handler stopped early: {e}", self.label),
            Err(e) => error!("Unhandled rejection in {} handler: {e}", self.label),
            Ok(()) => {}
        }

        result
    }

    /// Forcible teardown by the host.
    pub fn terminate(self) {
        self.handle.abort();
    }
}

fn join_failure(e: JoinError) -> HostError {
    if !e.is_panic() {
        return HostError::Terminated;
    }

    let panic = e.into_panic();
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    HostError::Panicked(message)
}
