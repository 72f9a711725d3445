//! Response classification for the BotBlock API.
//!
//! Every response the API sends falls into one of three buckets:
//!
//! - **Success** - any 2xx status, whatever the body contains. Per-destination
//!   rejections inside a 2xx body are the report submitter's concern, not ours.
//! - **Rate limited** - status 429. The body carries `retry_after`,
//!   `ratelimit_bot_id`, `ratelimit_ip` and `ratelimit_route`; anything missing or
//!   unparseable degrades to a sentinel instead of failing.
//! - **Failed** - any other status, with the server's message when it sent one.
//!
//! ```
//! use botblock_rate_limit::{classify, Classification};
//!
//! let body = r#"{"retry_after": 30, "ratelimit_bot_id": "1", "ratelimit_ip": "2", "ratelimit_route": "/count"}"#;
//! match classify(429, body) {
//!     Classification::RateLimited(signal) => assert_eq!(signal.retry_after, 30),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod detector;
mod signal;

pub use classifier::{Classification, classify};
pub use detector::retry_after_header;
pub use signal::parse_rate_limit_signal;

pub use botblock_error::{RateLimitSignal, UNKNOWN};
