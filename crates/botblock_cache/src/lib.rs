//! Read-through caching for BotBlock lookups with a fixed TTL.
//!
//! The API rate-limits bot and list lookups over a short window, so reads go
//! through a [`ReadCache`] that:
//!
//! - keeps each answer for [`CACHE_TTL`] (two minutes, measured from when it was
//!   written; reading does not extend it),
//! - coalesces concurrent misses for the same key into one fetch,
//! - remembers failures as [`CachedValue::Unavailable`] for the same TTL so a
//!   broken or rate-limited route is not hammered,
//! - can be bypassed per call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{CACHE_TTL, CacheEntry, CacheNamespace, CachedValue, ReadCache};
