//! Error types for the periodic task scheduler.

/// Scheduler error conditions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum SchedulerErrorKind {
    /// `start` called while a task is already scheduled
    #[display("Scheduler is already running")]
    AlreadyRunning,

    /// `start` called after the scheduler was stopped
    #[display("Scheduler has been stopped and cannot be restarted")]
    Terminated,

    /// The scheduled task panicked
    #[display("Scheduled task panicked: {}", _0)]
    TaskPanicked(String),
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Scheduler Error: {} at line {} in {}", kind, line, file)]
pub struct SchedulerError {
    /// The error kind
    pub kind: SchedulerErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl SchedulerError {
    /// Create a new SchedulerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SchedulerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
