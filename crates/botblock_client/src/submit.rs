//! Guild count submission.

use crate::{ApiRequest, DestinationCredentials, GuildReport, Transport};
use botblock_error::{BotBlockResult, DestinationFailure, JsonError, PartialFailureError};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Route reports are posted to.
pub const COUNT_ROUTE: &str = "count";

/// Posts guild counts to the broker.
///
/// Submissions are never cached.
#[derive(Debug, Clone)]
pub struct ReportSubmitter {
    transport: Arc<dyn Transport>,
}

impl ReportSubmitter {
    /// Create a submitter sending through `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Post `report` to every site in `credentials`.
    ///
    /// # Errors
    ///
    /// - precondition, before any I/O, if `credentials` is empty or the bot id is empty
    /// - transport, rate limited or JSON failures from the exchange
    /// - partial failure when the broker accepted the report but one or more
    ///   sites rejected it
    #[instrument(
        skip(self, report, credentials),
        fields(bot_id = %report.bot_id(), destinations = credentials.len())
    )]
    pub async fn submit(
        &self,
        report: &GuildReport,
        credentials: &DestinationCredentials,
    ) -> BotBlockResult<()> {
        let payload = report.to_payload(credentials)?;
        let body = serde_json::to_string(&payload)
            .map_err(|e| JsonError::new(format!("Failed to serialize report: {}", e)))?;

        debug!(server_count = report.server_count(), "Posting guild count");
        let response = self
            .transport
            .send(ApiRequest::post(COUNT_ROUTE, body, credentials.len()))
            .await?;
        response.classify().into_result()?;

        let failures = parse_partial_failures(response.body())?;
        if failures.is_empty() {
            info!("Guild count posted");
            return Ok(());
        }

        let err = PartialFailureError::new(failures);
        warn!(
            failed = err.failures.len(),
            error = %err,
            "One or more sites rejected the guild count"
        );
        Err(err.into())
    }
}

/// Read the per-site rejections out of a successful `count` response.
///
/// Each entry of the `failure` object should be a `[status, "message"]`
/// pair; anything else is recorded with unknown status and message. An absent
/// or empty `failure` object means every site accepted the report.
///
/// ```
/// use botblock_client::parse_partial_failures;
///
/// let failures =
///     parse_partial_failures(r#"{"success": {}, "failure": {"siteA": [404, "not found"]}}"#)
///         .unwrap();
/// assert_eq!(failures.len(), 1);
/// assert_eq!(failures[0].status, Some(404));
/// ```
///
/// # Errors
///
/// Fails only if `body` is not JSON.
pub fn parse_partial_failures(body: &str) -> BotBlockResult<Vec<DestinationFailure>> {
    let json: JsonValue = serde_json::from_str(body)
        .map_err(|e| JsonError::new(format!("Invalid count response: {}", e)))?;

    let Some(failure) = json.get("failure") else {
        return Ok(Vec::new());
    };
    let Some(failure) = failure.as_object() else {
        debug!(failure = %failure, "Ignoring non-object failure field");
        return Ok(Vec::new());
    };

    let mut failures: Vec<_> = failure
        .iter()
        .map(|(site, detail)| destination_failure(site, detail))
        .collect();
    failures.sort();
    Ok(failures)
}

fn destination_failure(site: &str, detail: &JsonValue) -> DestinationFailure {
    match detail.as_array().map(Vec::as_slice) {
        Some([status, message]) => match (status.as_i64(), message.as_str()) {
            (Some(status), Some(message)) => DestinationFailure::new(site, status, message),
            _ => unreadable(site, detail),
        },
        _ => unreadable(site, detail),
    }
}

fn unreadable(site: &str, detail: &JsonValue) -> DestinationFailure {
    debug!(site, detail = %detail, "Unreadable failure entry");
    DestinationFailure::unknown(site)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_entries_degrade_to_unknown() {
        let body = r#"{"failure": {
            "good": [500, "boom"],
            "short": [404],
            "swapped": ["nope", 404],
            "scalar": "broken"
        }}"#;
        let failures = parse_partial_failures(body).unwrap();

        assert_eq!(failures.len(), 4);
        assert_eq!(failures[0], DestinationFailure::new("good", 500, "boom"));
        assert_eq!(failures[1], DestinationFailure::unknown("scalar"));
        assert_eq!(failures[2], DestinationFailure::unknown("short"));
        assert_eq!(failures[3], DestinationFailure::unknown("swapped"));
    }

    #[test]
    fn absent_or_empty_failure_is_success() {
        assert!(parse_partial_failures(r#"{"success": {}}"#).unwrap().is_empty());
        assert!(parse_partial_failures(r#"{"failure": {}}"#).unwrap().is_empty());
        assert!(parse_partial_failures(r#"{"failure": null}"#).unwrap().is_empty());
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(parse_partial_failures("OK").is_err());
    }
}
