// src/exec/ping.rs

//! `ping` action: HTTP GET and compare the response body.

use std::time::Duration;

use tracing::debug;

use crate::errors::{Result, SchedwatchError};

/// GET `url` and require the body to equal `expected` byte for byte.
///
/// The status code is not inspected; only the body matters.
pub async fn ping(
    client: &reqwest::Client,
    url: &str,
    expected: &str,
    timeout: Option<Duration>,
) -> Result<()> {
    let transport = |err: reqwest::Error| SchedwatchError::ActionTransport {
        url: url.to_string(),
        reason: err.to_string(),
    };

    let mut request = client.get(url);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.bytes().await.map_err(transport)?;

    debug!(%url, %status, bytes = body.len(), "ping response received");

    if body.as_ref() != expected.as_bytes() {
        return Err(SchedwatchError::ActionMismatch {
            expected: expected.to_string(),
            actual: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(())
}
