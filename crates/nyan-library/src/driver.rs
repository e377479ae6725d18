use kanal::AsyncReceiver;
use nyan_config::loader::LoaderConfig;
use nyan_core::progress::drive;
use nyan_core::{Progress, Step, Stepper};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("load was cancelled")]
    Cancelled,

    #[error("load task failed: {0}")]
    Join(#[from] JoinError),
}

/// Resume `stepper` for one frame's worth of time.
pub fn drive_frame<S: Stepper>(stepper: &mut S, loader: &LoaderConfig) -> Option<S::Output> {
    drive(stepper, loader.time_slice())
}

/// A stepper running on a blocking task.
///
/// The stepper is moved into the task and its output comes back through
/// [`BackgroundLoad::join`]; the caller only ever sees progress snapshots.
pub struct BackgroundLoad<T> {
    progress: AsyncReceiver<Progress>,
    cancel: CancellationToken,
    handle: JoinHandle<Result<T, DriverError>>,
}

impl<T> BackgroundLoad<T> {
    /// Progress snapshots, oldest first. Snapshots are dropped rather than
    /// blocking the load when nobody reads them.
    pub fn progress(&self) -> &AsyncReceiver<Progress> {
        &self.progress
    }

    /// Stop before the next step.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> Result<T, DriverError> {
        self.handle.await?
    }
}

/// Run `stepper` to completion on tokio's blocking pool.
pub fn spawn_stepper<S>(stepper: S, progress_capacity: usize) -> BackgroundLoad<S::Output>
where
    S: Stepper + Send + 'static,
    S::Output: Send + 'static,
{
    let (tx, rx) = kanal::bounded(progress_capacity.max(1));
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let handle = tokio::task::spawn_blocking(move || {
        let mut stepper = stepper;
        loop {
            if token.is_cancelled() {
                tracing::info!("Background load cancelled at {:?}", stepper.progress());
                return Err(DriverError::Cancelled);
            }

            let progress = match stepper.step() {
                Step::Done(output) => {
                    let _ = tx.try_send(stepper.progress());
                    return Ok(output);
                }
                Step::Pending(progress) => progress,
            };

            tracing::debug!("{}/{} {}", progress.done, progress.total, progress.current);
            match tx.try_send(progress) {
                Ok(true) => {}
                Ok(false) => tracing::trace!("Progress channel full, dropping snapshot"),
                Err(_) => tracing::trace!("Progress receiver gone"),
            }
        }
    });

    BackgroundLoad {
        progress: rx.to_async(),
        cancel,
        handle,
    }
}
