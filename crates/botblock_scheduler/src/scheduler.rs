//! Fixed-rate scheduler implementation.

use botblock_error::{BotBlockResult, PreconditionError, SchedulerError, SchedulerErrorKind};
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SchedulerState {
    /// Created, `start` not called yet
    Idle,
    /// Ticking
    Running,
    /// Stopped for good
    Stopped,
}

/// Runs one task at a fixed rate until stopped.
///
/// Invocations never overlap: the worker awaits each one before waiting for
/// the next tick. Ticks missed while an invocation ran long are fired back to
/// back afterwards, keeping the long-run rate fixed.
#[derive(Debug)]
pub struct Scheduler {
    name: String,
    state: Mutex<SchedulerState>,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Create an idle scheduler. `name` only appears in log events.
    pub fn new(name: impl Into<String>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            name: name.into(),
            state: Mutex::new(SchedulerState::Idle),
            shutdown,
            worker: Mutex::new(None),
        }
    }

    /// Name used in log events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// True between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Invoke `task` after `initial_delay`, then every `period`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails if `period` is zero, if the scheduler is already running, or if
    /// it has been stopped.
    #[instrument(skip(self, task), fields(scheduler = %self.name))]
    pub fn start<F, Fut>(
        &self,
        period: Duration,
        initial_delay: Duration,
        task: F,
    ) -> BotBlockResult<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BotBlockResult<()>> + Send + 'static,
    {
        PreconditionError::check(period.is_zero(), "Period must be greater than zero.")?;

        let mut state = self.state.lock();
        match *state {
            SchedulerState::Running => {
                Err(SchedulerError::new(SchedulerErrorKind::AlreadyRunning))?
            }
            SchedulerState::Stopped => Err(SchedulerError::new(SchedulerErrorKind::Terminated))?,
            SchedulerState::Idle => {}
        }

        let shutdown = self.shutdown.subscribe();
        let name = self.name.clone();
        let handle = tokio::spawn(run_worker(name, period, initial_delay, task, shutdown));

        *self.worker.lock() = Some(handle);
        *state = SchedulerState::Running;
        info!(?period, ?initial_delay, "Scheduler started");
        Ok(())
    }

    /// Stop scheduling new invocations and return immediately.
    ///
    /// An invocation already in flight is left to finish on its own.
    #[instrument(skip(self), fields(scheduler = %self.name))]
    pub fn stop(&self) {
        if self.signal_stop() {
            info!("Scheduler stopped");
        }
        // Detach; the worker exits at its next wait point.
        self.worker.lock().take();
    }

    /// Stop scheduling new invocations, then wait up to `timeout` for the one
    /// in flight.
    ///
    /// Elapsing the timeout is logged, not returned as an error.
    ///
    /// # Errors
    ///
    /// Fails if `timeout` is zero.
    #[instrument(skip(self), fields(scheduler = %self.name))]
    pub async fn stop_with_timeout(&self, timeout: Duration) -> BotBlockResult<()> {
        PreconditionError::check(timeout.is_zero(), "Time may not be less or equal to 0.")?;

        self.signal_stop();
        let Some(handle) = self.worker.lock().take() else {
            debug!("No worker to wait for");
            return Ok(());
        };

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(())) => info!("Scheduler stopped gracefully"),
            Ok(Err(e)) => warn!(error = %e, "Scheduler worker ended abnormally"),
            Err(_) => warn!(
                ?timeout,
                "Timed out waiting for the in-flight task; leaving it to finish"
            ),
        }
        Ok(())
    }

    /// Mark stopped and wake the worker. Returns false if already stopped.
    fn signal_stop(&self) -> bool {
        let mut state = self.state.lock();
        if *state == SchedulerState::Stopped {
            return false;
        }
        *state = SchedulerState::Stopped;
        self.shutdown.send_replace(true);
        true
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if self.signal_stop() {
            debug!(scheduler = %self.name, "Scheduler dropped, stopping");
        }
    }
}

async fn run_worker<F, Fut>(
    name: String,
    period: Duration,
    initial_delay: Duration,
    task: F,
    mut shutdown: watch::Receiver<bool>,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BotBlockResult<()>> + Send + 'static,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + initial_delay, period);
    let mut invocation: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        invocation += 1;
        debug!(scheduler = %name, invocation, "Running scheduled task");

        match AssertUnwindSafe(async { task().await }).catch_unwind().await {
            Ok(Ok(())) => debug!(scheduler = %name, invocation, "Scheduled task completed"),
            Ok(Err(e)) => error!(
                scheduler = %name,
                invocation,
                error = %e,
                "Scheduled task failed; will retry next period"
            ),
            Err(payload) => {
                let err = SchedulerError::new(SchedulerErrorKind::TaskPanicked(panic_message(
                    payload.as_ref(),
                )));
                error!(scheduler = %name, invocation, error = %err, "Scheduled task panicked");
            }
        }
    }

    debug!(scheduler = %name, invocations = invocation, "Scheduler worker exiting");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
