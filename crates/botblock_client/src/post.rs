//! One-shot and periodic guild count posting.

use crate::{
    BotBlockConfig, DestinationCredentials, GuildReport, ReportSubmitter, ReqwestTransport,
    Transport, render_user_agent,
};
use botblock_error::BotBlockResult;
use botblock_scheduler::Scheduler;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Initial delay used by [`PostAction::enable_auto_post_after_startup`].
pub const STARTUP_DELAY: Duration = Duration::from_secs(60);

/// Posts guild counts to every configured site, on demand or on a timer.
///
/// Auto-posting runs on one dedicated worker. Once disabled it cannot be
/// enabled again on the same `PostAction`.
///
/// # Example
///
/// ```no_run
/// use botblock_client::{BotBlockConfigBuilder, GuildReport, PostAction};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BotBlockConfigBuilder::default()
///     .token("discordbots.org", "token")
///     .build()?;
/// let poster = PostAction::from_config(config, "1234")?;
///
/// poster.post_guilds(&GuildReport::new("1234", 42)).await?;
///
/// poster.enable_auto_post(|| GuildReport::new("1234", 42))?;
/// // ...
/// poster.disable_auto_post_with_config().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PostAction {
    submitter: ReportSubmitter,
    tokens: Arc<DestinationCredentials>,
    update_delay: Duration,
    scheduler: Scheduler,
}

impl PostAction {
    /// Create a poster sending through `transport`.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn new(transport: Arc<dyn Transport>, config: BotBlockConfig) -> BotBlockResult<Self> {
        config.validate()?;
        Ok(Self {
            submitter: ReportSubmitter::new(transport),
            tokens: Arc::new(config.tokens().clone()),
            update_delay: config.update_delay(),
            scheduler: Scheduler::new("auto-post"),
        })
    }

    /// Create a poster over HTTP, identifying as bot `id` in the User-Agent.
    pub fn from_config(config: BotBlockConfig, id: &str) -> BotBlockResult<Self> {
        let user_agent = render_user_agent(config.user_agent(), id)?;
        let transport = ReqwestTransport::new(config.base_url(), user_agent)?;
        Self::new(Arc::new(transport), config)
    }

    /// Interval between automatic posts.
    pub fn update_delay(&self) -> Duration {
        self.update_delay
    }

    /// True while auto-posting is enabled.
    pub fn is_auto_posting(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Post `report` once, surfacing every failure to the caller.
    #[instrument(skip(self, report), fields(bot_id = %report.bot_id()))]
    pub async fn post_guilds(&self, report: &GuildReport) -> BotBlockResult<()> {
        self.submitter.submit(report, &self.tokens).await
    }

    /// Post a fresh report from `report_source` every update delay, starting
    /// one update delay from now.
    ///
    /// Failed posts are logged and retried at the next tick.
    pub fn enable_auto_post<F>(&self, report_source: F) -> BotBlockResult<()>
    where
        F: Fn() -> GuildReport + Send + Sync + 'static,
    {
        self.enable_auto_post_with_initial_delay(self.update_delay, report_source)
    }

    /// Like [`enable_auto_post`](Self::enable_auto_post), but the first post
    /// happens after [`STARTUP_DELAY`].
    pub fn enable_auto_post_after_startup<F>(&self, report_source: F) -> BotBlockResult<()>
    where
        F: Fn() -> GuildReport + Send + Sync + 'static,
    {
        self.enable_auto_post_with_initial_delay(STARTUP_DELAY, report_source)
    }

    /// Post a fresh report from `report_source` after `initial_delay`, then
    /// every update delay.
    ///
    /// # Errors
    ///
    /// Fails if auto-posting is already enabled or was disabled before.
    #[instrument(skip(self, report_source))]
    pub fn enable_auto_post_with_initial_delay<F>(
        &self,
        initial_delay: Duration,
        report_source: F,
    ) -> BotBlockResult<()>
    where
        F: Fn() -> GuildReport + Send + Sync + 'static,
    {
        let submitter = self.submitter.clone();
        let tokens = Arc::clone(&self.tokens);

        self.scheduler
            .start(self.update_delay, initial_delay, move || {
                let submitter = submitter.clone();
                let tokens = Arc::clone(&tokens);
                let report = report_source();
                async move { submitter.submit(&report, &tokens).await }
            })?;

        info!(update_delay = ?self.update_delay, "Auto-posting enabled");
        Ok(())
    }

    /// Stop auto-posting without waiting for a post in flight.
    pub fn disable_auto_post(&self) {
        self.scheduler.stop();
    }

    /// Stop auto-posting and wait up to `timeout` for a post in flight.
    ///
    /// # Errors
    ///
    /// Fails if `timeout` is zero.
    pub async fn disable_auto_post_with_timeout(&self, timeout: Duration) -> BotBlockResult<()> {
        self.scheduler.stop_with_timeout(timeout).await
    }

    /// Stop auto-posting and wait up to one update delay for a post in flight.
    pub async fn disable_auto_post_with_config(&self) -> BotBlockResult<()> {
        self.disable_auto_post_with_timeout(self.update_delay).await
    }
}
