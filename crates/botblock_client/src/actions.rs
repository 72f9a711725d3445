//! Cached lookups over the API's read routes.

use crate::{
    ApiRequest, BotBlockConfig, BotInfo, ListInfo, ReqwestTransport, Transport, path_segment,
    render_user_agent,
};
use botblock_cache::{CacheNamespace, CachedValue, ReadCache};
use botblock_error::{BotBlockResult, JsonError, PreconditionError};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cache shared by the read actions. Values are parsed response bodies.
pub type JsonCache = ReadCache<Arc<JsonValue>>;

/// GET `request`, classify the response and parse the body.
#[instrument(skip(transport, request), fields(path = %request.path()))]
pub async fn fetch_json(
    transport: Arc<dyn Transport>,
    request: ApiRequest,
) -> BotBlockResult<Arc<JsonValue>> {
    let response = transport.send(request).await?;
    response.classify().into_result()?;

    let json = serde_json::from_str(response.body())
        .map_err(|e| JsonError::new(format!("Invalid response body: {}", e)))?;
    debug!("Response parsed");
    Ok(Arc::new(json))
}

fn transport_for(config: &BotBlockConfig, id: &str) -> BotBlockResult<Arc<dyn Transport>> {
    let user_agent = render_user_agent(config.user_agent(), id)?;
    Ok(Arc::new(ReqwestTransport::new(config.base_url(), user_agent)?))
}

/// Lookups of one bot's aggregated information (`GET bots/{id}`).
///
/// Answers are cached for two minutes per bot id unless the cache is disabled.
#[derive(Debug, Clone)]
pub struct GetBotAction {
    transport: Arc<dyn Transport>,
    cache: JsonCache,
    disable_cache: bool,
}

impl GetBotAction {
    /// Create an action sending through `transport`.
    pub fn new(transport: Arc<dyn Transport>, disable_cache: bool) -> Self {
        Self {
            transport,
            cache: JsonCache::new(),
            disable_cache,
        }
    }

    /// Create an action over HTTP, identifying as bot `id` in the User-Agent.
    pub fn from_config(config: &BotBlockConfig, id: &str) -> BotBlockResult<Self> {
        Ok(Self::new(transport_for(config, id)?, *config.disable_cache()))
    }

    /// Use `cache` instead of a private one, e.g. to share it with a
    /// [`GetListAction`].
    pub fn with_cache(mut self, cache: JsonCache) -> Self {
        self.cache = cache;
        self
    }

    /// The full JSON record for bot `id`.
    ///
    /// # Errors
    ///
    /// Fails only if `id` is empty, `.` or `..`. Fetch failures come back as
    /// [`CachedValue::Unavailable`].
    #[instrument(skip(self))]
    pub async fn get_bot_info(&self, id: &str) -> BotBlockResult<CachedValue<Arc<JsonValue>>> {
        let request = ApiRequest::get(format!("bots/{}", path_segment(id, "ID")?));
        let transport = Arc::clone(&self.transport);
        Ok(self
            .cache
            .get_or_fetch(CacheNamespace::Bot, id, self.disable_cache, move || {
                fetch_json(transport, request)
            })
            .await)
    }

    /// Typed view of [`get_bot_info`](Self::get_bot_info).
    pub async fn get_bot(&self, id: &str) -> BotBlockResult<CachedValue<BotInfo>> {
        Ok(self
            .get_bot_info(id)
            .await?
            .map(|json| BotInfo::from_json(&json)))
    }

    /// The `list_data` object: site name → what that site returned for the bot.
    pub async fn get_bot_list_info(
        &self,
        id: &str,
    ) -> BotBlockResult<CachedValue<Map<String, JsonValue>>> {
        Ok(self.get_bot_info(id).await?.map(|json| {
            json.get("list_data")
                .and_then(JsonValue::as_object)
                .cloned()
                .unwrap_or_default()
        }))
    }

    /// What one site returned for the bot, if it knows it.
    pub async fn get_bot_list_info_for_site(
        &self,
        id: &str,
        site: &str,
    ) -> BotBlockResult<CachedValue<Option<JsonValue>>> {
        PreconditionError::check_not_empty(site, "Site")?;
        Ok(self
            .get_bot_list_info(id)
            .await?
            .map(|lists| lists.get(site).cloned()))
    }
}

/// Lookups of the bot list catalogue (`GET lists`, `GET lists/{site}`).
///
/// Answers are cached for two minutes per route.
#[derive(Debug, Clone)]
pub struct GetListAction {
    transport: Arc<dyn Transport>,
    cache: JsonCache,
    disable_cache: bool,
}

impl GetListAction {
    /// Create an action sending through `transport`.
    pub fn new(transport: Arc<dyn Transport>, disable_cache: bool) -> Self {
        Self {
            transport,
            cache: JsonCache::new(),
            disable_cache,
        }
    }

    /// Create an action over HTTP, identifying as bot `id` in the User-Agent.
    pub fn from_config(config: &BotBlockConfig, id: &str) -> BotBlockResult<Self> {
        Ok(Self::new(transport_for(config, id)?, *config.disable_cache()))
    }

    /// Use `cache` instead of a private one.
    pub fn with_cache(mut self, cache: JsonCache) -> Self {
        self.cache = cache;
        self
    }

    /// Every list BotBlock knows, keyed by site name.
    pub async fn get_lists(&self) -> CachedValue<Arc<JsonValue>> {
        self.fetch("lists".to_string()).await
    }

    /// Only the lists that are not defunct, keyed by site name.
    pub async fn get_filtered_lists(&self) -> CachedValue<Arc<JsonValue>> {
        self.fetch("lists?filter=true".to_string()).await
    }

    /// One list's record.
    ///
    /// # Errors
    ///
    /// Fails only if `site` is empty, `.` or `..`.
    pub async fn get_list(&self, site: &str) -> BotBlockResult<CachedValue<Arc<JsonValue>>> {
        let route = format!("lists/{}", path_segment(site, "Site")?);
        Ok(self.fetch(route).await)
    }

    /// Typed view of [`get_lists`](Self::get_lists) or
    /// [`get_filtered_lists`](Self::get_filtered_lists).
    pub async fn get_list_catalogue(
        &self,
        filtered: bool,
    ) -> CachedValue<BTreeMap<String, ListInfo>> {
        let lists = if filtered {
            self.get_filtered_lists().await
        } else {
            self.get_lists().await
        };
        lists.map(|json| ListInfo::catalogue(&json))
    }

    /// Typed view of [`get_list`](Self::get_list).
    pub async fn get_list_info(&self, site: &str) -> BotBlockResult<CachedValue<ListInfo>> {
        Ok(self
            .get_list(site)
            .await?
            .map(|json| ListInfo::from_json(&json)))
    }

    #[instrument(skip(self))]
    async fn fetch(&self, route: String) -> CachedValue<Arc<JsonValue>> {
        let request = ApiRequest::get(&route);
        let transport = Arc::clone(&self.transport);
        self.cache
            .get_or_fetch(CacheNamespace::List, &route, self.disable_cache, move || {
                fetch_json(transport, request)
            })
            .await
    }
}
