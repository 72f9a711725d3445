//! Client configuration.
//!
//! Configuration is layered, later sources overriding earlier ones:
//! 1. Bundled defaults (`botblock.toml` shipped with the library)
//! 2. `~/.config/botblock/botblock.toml`
//! 3. `./botblock.toml`
//! 4. `BOTBLOCK_*` environment variables (a `.env` file is loaded first)

use crate::{BASE_URL, DEFAULT_USER_AGENT};
use botblock_error::{BotBlockResult, ConfigError, PreconditionError};
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default minutes between automatic reports.
pub const DEFAULT_UPDATE_DELAY_MINUTES: u64 = 30;

/// Smallest accepted update delay. The API rejects faster reporting.
pub const MIN_UPDATE_DELAY_MINUTES: u64 = 2;

/// Tokens, reporting cadence and HTTP identity for a BotBlock client.
///
/// # Example
///
/// ```
/// use botblock_client::BotBlockConfigBuilder;
///
/// let config = BotBlockConfigBuilder::default()
///     .token("discordbots.org", "abc")
///     .update_delay_minutes(5u64)
///     .build()
///     .unwrap();
/// assert_eq!(config.tokens().len(), 1);
/// assert_eq!(config.update_delay().as_secs(), 300);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct BotBlockConfig {
    /// Site name → API token. Every entry is sent with each report.
    #[serde(default)]
    #[builder(default)]
    tokens: BTreeMap<String, String>,

    /// Minutes between automatic reports
    #[serde(default = "default_update_delay_minutes")]
    #[builder(default = "DEFAULT_UPDATE_DELAY_MINUTES")]
    update_delay_minutes: u64,

    /// User-Agent template; `{id}` is replaced with the bot id
    #[serde(default = "default_user_agent")]
    #[builder(default = "DEFAULT_USER_AGENT.to_string()")]
    user_agent: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    #[builder(default = "BASE_URL.to_string()")]
    base_url: String,

    /// Bypass the read cache for every lookup
    #[serde(default)]
    #[builder(default)]
    disable_cache: bool,
}

fn default_update_delay_minutes() -> u64 {
    DEFAULT_UPDATE_DELAY_MINUTES
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

impl BotBlockConfigBuilder {
    /// Add one site token.
    pub fn token(&mut self, site: impl Into<String>, token: impl Into<String>) -> &mut Self {
        self.tokens
            .get_or_insert_with(BTreeMap::new)
            .insert(site.into(), token.into());
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Fails if no tokens were added, a site or token is empty, or the update
    /// delay is below [`MIN_UPDATE_DELAY_MINUTES`].
    pub fn build(&self) -> BotBlockResult<BotBlockConfig> {
        let config = self
            .build_internal()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl BotBlockConfig {
    /// Interval between automatic reports.
    pub fn update_delay(&self) -> Duration {
        Duration::from_secs(self.update_delay_minutes.saturating_mul(60))
    }

    /// Check the preconditions every consumer relies on.
    pub fn validate(&self) -> BotBlockResult<()> {
        PreconditionError::check(self.tokens.is_empty(), "Tokens may not be empty.")?;
        for (site, token) in &self.tokens {
            PreconditionError::check_not_empty(site, "Site")?;
            PreconditionError::check_not_empty(token, &format!("Token for {}", site))?;
        }
        PreconditionError::check(
            self.update_delay_minutes < MIN_UPDATE_DELAY_MINUTES,
            format!(
                "Update delay may not be less than {}.",
                MIN_UPDATE_DELAY_MINUTES
            ),
        )?;
        PreconditionError::check_not_empty(&self.user_agent, "UserAgent")?;
        PreconditionError::check_not_empty(&self.base_url, "Base URL")?;
        Ok(())
    }

    /// Load configuration from a specific file path.
    ///
    /// The file is not validated; call [`validate`](Self::validate) once tokens
    /// are known to be present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BotBlockResult<Self> {
        debug!("Loading configuration from file");

        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > current dir > home
    /// dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use botblock_client::BotBlockConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = BotBlockConfig::load()?;
    /// config.validate()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> BotBlockResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        const DEFAULT_CONFIG: &str = include_str!("../../../botblock.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/botblock/botblock.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("botblock").required(false))
            .add_source(Environment::with_prefix("BOTBLOCK").try_parsing(true));

        let config = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }
}
