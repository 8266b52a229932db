//! HTTP submission of daily payloads
//!
//! The agent's only wire protocol: one POST per date to `<server>/sync` with
//! an `X-Api-Key` header. A 2xx status is success; anything else, including
//! timeouts and transport faults, is a failure for that date only.

use healthsync_shared::{DailyPayload, SyncError};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Normalize a configured base URL into the submission endpoint: trailing
/// slashes are stripped and `/sync` appended unless already present
pub fn normalize_url(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.ends_with("/sync") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/sync")
    }
}

/// Thin wrapper over a pre-built [`reqwest::Client`]
pub struct Submitter {
    client: reqwest::Client,
}

impl Submitter {
    /// Build a submitter with a fixed total request timeout
    pub fn new(timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    /// POST one day's payload; `endpoint` must already be normalized
    pub async fn post_day(
        &self,
        endpoint: &str,
        token: &str,
        payload: &DailyPayload,
    ) -> Result<(), SyncError> {
        let body = serde_json::to_vec(payload).map_err(|e| SyncError::Http(e.to_string()))?;
        let response = self
            .client
            .post(endpoint)
            .header("X-Api-Key", token)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| SyncError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Http(format!("server returned {status}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://h.example", "https://h.example/sync")]
    #[case("https://h.example/", "https://h.example/sync")]
    #[case("https://h.example///", "https://h.example/sync")]
    #[case("https://h.example/sync", "https://h.example/sync")]
    #[case("https://h.example/sync/", "https://h.example/sync")]
    #[case("  https://h.example ", "https://h.example/sync")]
    fn normalizes_base_urls(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_url(input), expected);
    }
}
