//! HTTP fetching with bounded retries and a per-attempt timeout.

use ragkit_core::{RagError, Result, WebSearchConfig};
use tracing::warn;

/// Fetch `url`, retrying up to `config.retry_attempts` times.
///
/// Each attempt is bounded by `config.timeout`; a non-2xx status counts
/// as a failed attempt. The wait between attempts grows linearly
/// (`retry_delay × attempt number`). The last error is surfaced once
/// every attempt is exhausted.
///
/// # Errors
///
/// Returns [`RagError::Extraction`] carrying the last attempt's failure.
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    config: &WebSearchConfig,
) -> Result<String> {
    let attempts = config.retry_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match try_fetch(client, url, config).await {
            Ok(body) => return Ok(body),
            Err(message) => {
                warn!(url, attempt, attempts, error = %message, "fetch attempt failed");
                last_error = message;
                if attempt < attempts {
                    tokio::time::sleep(config.retry_delay * attempt).await;
                }
            }
        }
    }

    Err(RagError::Extraction { url: url.to_string(), message: last_error })
}

async fn try_fetch(
    client: &reqwest::Client,
    url: &str,
    config: &WebSearchConfig,
) -> std::result::Result<String, String> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, &config.user_agent)
        .timeout(config.timeout)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }

    response.text().await.map_err(|e| e.to_string())
}
