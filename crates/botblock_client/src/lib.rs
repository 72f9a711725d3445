//! Client for the BotBlock statistics API.
//!
//! BotBlock forwards a bot's guild count to every bot list site the caller
//! holds a token for, and aggregates what those sites know about a bot.
//!
//! - [`ReportSubmitter`] posts one [`GuildReport`] and surfaces per-site
//!   rejections as a partial failure.
//! - [`PostAction`] wraps the submitter with configured tokens and optional
//!   periodic posting.
//! - [`GetBotAction`] and [`GetListAction`] read bot and list information
//!   through a two-minute cache.
//! - [`Transport`] is the seam to the network; [`ReqwestTransport`] is the
//!   HTTP implementation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actions;
mod config;
mod models;
mod payload;
mod post;
mod request;
mod submit;
mod transport;
mod user_agent;

pub use actions::{GetBotAction, GetListAction, JsonCache, fetch_json};
pub use config::{
    BotBlockConfig, BotBlockConfigBuilder, DEFAULT_UPDATE_DELAY_MINUTES, MIN_UPDATE_DELAY_MINUTES,
};
pub use models::{BotInfo, ListFeature, ListInfo};
pub use payload::{DestinationCredentials, GuildReport, ShardInfo};
pub use post::{PostAction, STARTUP_DELAY};
pub use request::{
    ApiRequest, GET_TIMEOUT, Method, POST_TIMEOUT_PER_DESTINATION, RawResponse, path_segment,
    post_timeout,
};
pub use submit::{COUNT_ROUTE, ReportSubmitter, parse_partial_failures};
pub use transport::{BASE_URL, ReqwestTransport, Transport};
pub use user_agent::{DEFAULT_USER_AGENT, ID_PLACEHOLDER, render_user_agent};
