use anyhow::{Context, Result};
use std::time::Duration;

pub const NON_SUCCESS_STATUS: &str = "Non-success status code";

const USER_AGENT: &str = "xrate/1.0";

/// Builds the pooled HTTP client a provider keeps for its lifetime.
///
/// # Parameters
/// - `timeout`: Total per-request timeout; `None` waits indefinitely
pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}
