//! Shared HTTP client construction and error mapping.

use reqwest::Client;
use rolesync_error::{UpstreamError, UpstreamErrorKind};
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout applied to every upstream request unless configured otherwise.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the client shared by all upstream collaborators.
///
/// # Errors
///
/// Returns an [`UpstreamError`] if the TLS backend cannot be initialised.
pub fn build_http_client(timeout: Duration) -> Result<Client, UpstreamError> {
    debug!(timeout_ms = timeout.as_millis() as u64, "Building HTTP client");
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("rolesync/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Transport {
                service: "http",
                reason: e.to_string(),
            })
        })
}

/// Translate a failed send into the matching upstream error.
#[track_caller]
pub(crate) fn send_error(service: &'static str, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        warn!(service, "Request timed out");
        UpstreamError::new(UpstreamErrorKind::Timeout(service))
    } else {
        warn!(service, error = %err, "Request failed");
        UpstreamError::new(UpstreamErrorKind::Transport {
            service,
            reason: err.to_string(),
        })
    }
}

/// Translate an undecodable body into a parse error.
#[track_caller]
pub(crate) fn body_error(service: &'static str, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        return UpstreamError::new(UpstreamErrorKind::Timeout(service));
    }
    warn!(service, error = %err, "Failed to decode response body");
    UpstreamError::new(UpstreamErrorKind::Parse {
        service,
        reason: err.to_string(),
    })
}
