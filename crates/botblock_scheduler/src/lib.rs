//! Periodic execution of one reporting task.
//!
//! A [`Scheduler`] runs a single async task at a fixed rate on one dedicated
//! tokio task. Failures and panics inside an invocation are logged and the
//! schedule carries on. Stopping is one-way: once stopped, a scheduler cannot
//! be started again.
//!
//! # Example
//!
//! ```
//! use botblock_error::BotBlockResult;
//! use botblock_scheduler::Scheduler;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> BotBlockResult<()> {
//! let scheduler = Scheduler::new("stats");
//! scheduler.start(Duration::from_secs(60), Duration::ZERO, || async {
//!     // submit a report here
//!     Ok(())
//! })?;
//! assert!(scheduler.is_running());
//!
//! scheduler.stop_with_timeout(Duration::from_secs(5)).await?;
//! assert!(!scheduler.is_running());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod scheduler;

pub use scheduler::{Scheduler, SchedulerState};
