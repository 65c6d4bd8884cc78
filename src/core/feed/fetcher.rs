use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use super::parser::{parse_feed_bytes, FeedParseError};
use super::types::{CandidateEntry, FeedEntry};
use crate::core::config::Config;
use crate::core::context::{Interrupted, RunContext};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("failed to parse feed: {0}")]
    Parse(#[from] FeedParseError),
    #[error("fetch interrupted: {0}")]
    Interrupted(#[from] Interrupted),
}

pub async fn fetch_feed(
    client: &reqwest::Client,
    ctx: &RunContext,
    config: &Config,
) -> Result<Vec<u8>, FetchError> {
    let mut request = client.get(&config.atom_url);
    if let Some(auth) = &config.basic_auth {
        request = request.basic_auth(&auth.username, Some(&auth.password));
    }

    let response = ctx.run(request.send()).await??;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = ctx.run(response.bytes()).await??;
    Ok(body.to_vec())
}

/// Fetches the configured feed and keeps the entries updated within `config.interval`.
pub async fn fetch_candidates(
    client: &reqwest::Client,
    ctx: &RunContext,
    config: &Config,
) -> Result<Vec<CandidateEntry>, FetchError> {
    let body = fetch_feed(client, ctx, config).await?;
    let entries = parse_feed_bytes(&body)?;
    let total = entries.len();
    let candidates = filter_recent(entries, Utc::now(), config.interval);
    tracing::info!(
        feed_url = %config.atom_url,
        total,
        recent = candidates.len(),
        "fetched feed"
    );
    Ok(candidates)
}

/// Keeps entries whose age is strictly below `interval`, in feed order.
pub fn filter_recent(
    entries: Vec<FeedEntry>,
    now: DateTime<Utc>,
    interval: Duration,
) -> Vec<CandidateEntry> {
    let window = TimeDelta::from_std(interval).unwrap_or(TimeDelta::MAX);
    entries
        .into_iter()
        .filter(|entry| match entry.updated_at {
            Some(updated_at) => now.signed_duration_since(updated_at) < window,
            None => {
                tracing::debug!(link = %entry.link, "skipping entry without update timestamp");
                false
            }
        })
        .map(CandidateEntry::from)
        .collect()
}
