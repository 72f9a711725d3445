//! User-Agent templating.

use botblock_error::{BotBlockResult, PreconditionError};

/// Placeholder replaced with the bot id.
pub const ID_PLACEHOLDER: &str = "{id}";

/// User-Agent used when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "botblock-rs/",
    env!("CARGO_PKG_VERSION"),
    " (Unknown; +https://github.com/crumplecup/botblock) DBots/{id}"
);

/// Replace every `{id}` in `template` with `id`.
///
/// ```
/// use botblock_client::render_user_agent;
///
/// let ua = render_user_agent("MyBot/1.0 DBots/{id}", "1234").unwrap();
/// assert_eq!(ua, "MyBot/1.0 DBots/1234");
/// ```
///
/// # Errors
///
/// Fails if either argument is empty.
pub fn render_user_agent(template: &str, id: &str) -> BotBlockResult<String> {
    PreconditionError::check_not_empty(template, "UserAgent")?;
    PreconditionError::check_not_empty(id, "ID")?;
    Ok(template.replace(ID_PLACEHOLDER, id))
}
