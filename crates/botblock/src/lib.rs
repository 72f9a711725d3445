//! BotBlock - guild count reporting for Discord bot lists
//!
//! BotBlock fans one guild-count report out to many bot list sites and serves
//! cached bot and list metadata. This crate re-exports the workspace for
//! convenience.
//!
//! # Quick Start
//!
//! ```no_run
//! use botblock::{BotBlockConfigBuilder, GuildReport, PostAction};
//!
//! # async fn run() -> botblock::BotBlockResult<()> {
//! botblock::init_tracing()?;
//!
//! let config = BotBlockConfigBuilder::default()
//!     .token("discordbots.org", "my-token")
//!     .build()?;
//! let poster = PostAction::from_config(config, "123456789012345678")?;
//!
//! // One report now
//! poster.post_guilds(&GuildReport::new("123456789012345678", 350)).await?;
//!
//! // Then one every update delay
//! poster.enable_auto_post(|| GuildReport::new("123456789012345678", 351))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `botblock_error` - Error types
//! - `botblock_rate_limit` - Response classification and 429 parsing
//! - `botblock_cache` - Single-flight TTL read cache
//! - `botblock_scheduler` - Fixed-rate task scheduler
//! - `botblock_client` - Transport, submitter, lookups and configuration

#![warn(missing_docs)]

mod telemetry;

pub use telemetry::{DEFAULT_LOG_FILTER, TelemetryConfig, init_tracing, init_tracing_with_config};

pub use botblock_error::{
    BotBlockError, BotBlockErrorKind, BotBlockResult, ConfigError, DestinationFailure, JsonError,
    PartialFailureError, PreconditionError, RateLimitSignal, RateLimitedError, SchedulerError,
    SchedulerErrorKind, TransportError, TransportErrorKind, UNKNOWN,
};

pub use botblock_rate_limit::{
    Classification, classify, parse_rate_limit_signal, retry_after_header,
};

pub use botblock_cache::{CACHE_TTL, CacheEntry, CacheNamespace, CachedValue, ReadCache};

pub use botblock_scheduler::{Scheduler, SchedulerState};

pub use botblock_client::{
    ApiRequest, BASE_URL, BotBlockConfig, BotBlockConfigBuilder, BotInfo, COUNT_ROUTE,
    DEFAULT_UPDATE_DELAY_MINUTES, DEFAULT_USER_AGENT, DestinationCredentials, GET_TIMEOUT,
    GetBotAction, GetListAction, GuildReport, ID_PLACEHOLDER, JsonCache, ListFeature, ListInfo,
    MIN_UPDATE_DELAY_MINUTES, Method, POST_TIMEOUT_PER_DESTINATION, PostAction, RawResponse,
    ReportSubmitter, ReqwestTransport, STARTUP_DELAY, ShardInfo, Transport, fetch_json,
    parse_partial_failures, path_segment, post_timeout, render_user_agent,
};
