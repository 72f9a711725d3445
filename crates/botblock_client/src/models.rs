//! Typed views over the read routes' JSON.
//!
//! The API is inconsistent about types (ids arrive as strings or numbers,
//! flags as booleans or `0`/`1`), so every field is optional and a field of the
//! wrong shape is read as `None` instead of failing the whole record.

use derive_getters::Getters;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// A bot as aggregated by `GET bots/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct BotInfo {
    id: Option<String>,
    username: Option<String>,
    discriminator: Option<String>,
    owners: Vec<String>,
    server_count: Option<u64>,
    invite: Option<String>,
    prefix: Option<String>,
    website: Option<String>,
    github: Option<String>,
    support: Option<String>,
    library: Option<String>,
    /// Raw per-site data, keyed by site name
    list_data: Map<String, JsonValue>,
}

impl BotInfo {
    /// Read a bot record, tolerating missing or mistyped fields.
    ///
    /// ```
    /// use botblock_client::BotInfo;
    /// use serde_json::json;
    ///
    /// let info = BotInfo::from_json(&json!({
    ///     "id": "1234",
    ///     "username": "MyBot",
    ///     "server_count": "not a number",
    ///     "owners": ["1", 2],
    /// }));
    /// assert_eq!(info.username().as_deref(), Some("MyBot"));
    /// assert_eq!(*info.server_count(), None);
    /// assert_eq!(info.owners(), &vec!["1".to_string(), "2".to_string()]);
    /// ```
    pub fn from_json(json: &JsonValue) -> Self {
        Self {
            id: string(json, "id"),
            username: string(json, "username"),
            discriminator: string(json, "discriminator"),
            owners: strings(json, "owners"),
            server_count: field(json, "server_count"),
            invite: string(json, "invite"),
            prefix: string(json, "prefix"),
            website: string(json, "website"),
            github: string(json, "github"),
            support: string(json, "support"),
            library: string(json, "library"),
            list_data: field(json, "list_data").unwrap_or_default(),
        }
    }

    /// Raw data one site returned for this bot.
    pub fn list_data_for(&self, site: &str) -> Option<&JsonValue> {
        self.list_data.get(site)
    }
}

/// One capability a list advertises.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct ListFeature {
    name: Option<String>,
    id: Option<String>,
    display: Option<i64>,
    kind: Option<i64>,
    value: Option<i64>,
    description: Option<String>,
}

impl ListFeature {
    fn from_json(json: &JsonValue) -> Self {
        Self {
            name: string(json, "name"),
            id: string(json, "id"),
            display: field(json, "display"),
            kind: field(json, "type"),
            value: field(json, "value"),
            description: string(json, "description"),
        }
    }
}

/// A bot list site as described by `GET lists` or `GET lists/{site}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct ListInfo {
    id: Option<String>,
    name: Option<String>,
    url: Option<String>,
    icon: Option<String>,
    language: Option<String>,
    description: Option<String>,
    owners: Option<String>,
    discord: Option<String>,
    /// Unix timestamp the list was added to BotBlock
    added: Option<i64>,
    defunct: Option<bool>,
    discord_only: Option<bool>,
    features: Vec<ListFeature>,
    bot_widget: Option<String>,
    view_bot: Option<String>,
    api_docs: Option<String>,
    api_post: Option<String>,
    api_field: Option<String>,
    api_shard_id: Option<String>,
    api_shard_count: Option<String>,
    api_shards: Option<String>,
    api_get: Option<String>,
    api_all: Option<String>,
}

impl ListInfo {
    /// Read a list record, tolerating missing or mistyped fields.
    pub fn from_json(json: &JsonValue) -> Self {
        Self {
            id: string(json, "id"),
            name: string(json, "name"),
            url: string(json, "url"),
            icon: string(json, "icon"),
            language: string(json, "language"),
            description: string(json, "description"),
            owners: string(json, "owners"),
            discord: string(json, "discord"),
            added: field(json, "added"),
            defunct: flag(json, "defunct"),
            discord_only: flag(json, "discord_only"),
            features: json
                .get("features")
                .and_then(JsonValue::as_array)
                .map(|features| features.iter().map(ListFeature::from_json).collect())
                .unwrap_or_default(),
            bot_widget: string(json, "bot_widget"),
            view_bot: string(json, "view_bot"),
            api_docs: string(json, "api_docs"),
            api_post: string(json, "api_post"),
            api_field: string(json, "api_field"),
            api_shard_id: string(json, "api_shard_id"),
            api_shard_count: string(json, "api_shard_count"),
            api_shards: string(json, "api_shards"),
            api_get: string(json, "api_get"),
            api_all: string(json, "api_all"),
        }
    }

    /// Read the `GET lists` catalogue: site name → list record.
    ///
    /// Entries that are not objects are skipped.
    pub fn catalogue(json: &JsonValue) -> BTreeMap<String, ListInfo> {
        json.as_object()
            .map(|lists| {
                lists
                    .iter()
                    .filter(|(_, list)| list.is_object())
                    .map(|(site, list)| (site.clone(), ListInfo::from_json(list)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn field<T: DeserializeOwned>(json: &JsonValue, key: &str) -> Option<T> {
    json.get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

/// Strings, with numbers accepted and stringified.
fn string(json: &JsonValue, key: &str) -> Option<String> {
    json.get(key).and_then(as_string)
}

fn strings(json: &JsonValue, key: &str) -> Vec<String> {
    json.get(key)
        .and_then(JsonValue::as_array)
        .map(|values| values.iter().filter_map(as_string).collect())
        .unwrap_or_default()
}

fn as_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Booleans, with `0`/`1` accepted.
fn flag(json: &JsonValue, key: &str) -> Option<bool> {
    match json.get(key)? {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}
