//! Report payload construction.

use botblock_error::{BotBlockResult, PreconditionError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::BTreeMap;

/// Site name → API token.
pub type DestinationCredentials = BTreeMap<String, String>;

/// How the bot's guilds are split across shards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShardInfo {
    /// Unsharded bot
    #[default]
    None,
    /// This process is one shard of several
    Single {
        /// Zero-based shard index
        shard_id: u64,
        /// Total number of shards
        shard_count: u64,
    },
    /// Guild count of every shard, in shard order
    Multi {
        /// Per-shard guild counts
        shards: Vec<u64>,
    },
}

/// One guild count report for a bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct GuildReport {
    /// Bot id
    #[setters(skip)]
    bot_id: String,
    /// Total guild count
    server_count: u64,
    /// Shard layout
    shards: ShardInfo,
}

impl GuildReport {
    /// Report for an unsharded bot.
    ///
    /// ```
    /// use botblock_client::{GuildReport, ShardInfo};
    ///
    /// let report = GuildReport::new("1234", 42).with_shards(ShardInfo::Single {
    ///     shard_id: 0,
    ///     shard_count: 2,
    /// });
    /// assert_eq!(*report.server_count(), 42);
    /// ```
    pub fn new(bot_id: impl Into<String>, server_count: u64) -> Self {
        Self {
            bot_id: bot_id.into(),
            server_count,
            shards: ShardInfo::None,
        }
    }

    /// Build the JSON body for `POST count`.
    ///
    /// Keys: `server_count`, `bot_id`, the shard fields if any, then one key
    /// per credential holding its token.
    ///
    /// # Errors
    ///
    /// Fails if the bot id is empty or there are no credentials.
    pub fn to_payload(&self, credentials: &DestinationCredentials) -> BotBlockResult<JsonValue> {
        PreconditionError::check_not_empty(&self.bot_id, "botId")?;
        PreconditionError::check(credentials.is_empty(), "Tokens may not be empty.")?;

        let mut payload = Map::new();
        payload.insert("server_count".into(), json!(self.server_count));
        payload.insert("bot_id".into(), json!(self.bot_id));

        match &self.shards {
            ShardInfo::None => {}
            ShardInfo::Single {
                shard_id,
                shard_count,
            } => {
                payload.insert("shard_id".into(), json!(shard_id));
                payload.insert("shard_count".into(), json!(shard_count));
            }
            ShardInfo::Multi { shards } => {
                payload.insert("shard_count".into(), json!(shards.len()));
                payload.insert("shards".into(), json!(shards));
            }
        }

        for (site, token) in credentials {
            payload.insert(site.clone(), json!(token));
        }

        Ok(JsonValue::Object(payload))
    }
}
