use reqwest::header::CONTENT_TYPE;

use super::payload::NotificationPayload;
use crate::core::config::Config;
use crate::core::context::{Interrupted, RunContext};
use crate::core::feed::CandidateEntry;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("delivery interrupted: {0}")]
    Interrupted(#[from] Interrupted),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed(String),
    /// Not attempted because the run was interrupted first.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub title: String,
    pub link: String,
    pub status: DeliveryStatus,
}

impl DeliveryRecord {
    fn new(entry: &CandidateEntry, status: DeliveryStatus) -> Self {
        Self {
            title: entry.title.clone(),
            link: entry.link.clone(),
            status,
        }
    }
}

/// One record per candidate, in the order deliveries were attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub records: Vec<DeliveryRecord>,
    pub interrupted: Option<Interrupted>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Delivered))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, DeliveryStatus::Failed(_)))
    }

    pub fn was_interrupted(&self) -> bool {
        self.interrupted.is_some()
    }

    fn count(&self, predicate: impl Fn(&DeliveryStatus) -> bool) -> usize {
        self.records
            .iter()
            .filter(|record| predicate(&record.status))
            .count()
    }
}

pub async fn send_to_slack(
    client: &reqwest::Client,
    ctx: &RunContext,
    webhook_url: &str,
    payload: &NotificationPayload,
) -> Result<(), DeliveryError> {
    let body = serde_json::to_vec(payload)?;
    let request = client
        .post(webhook_url)
        .header(CONTENT_TYPE, "application/json")
        .body(body);

    let response = ctx.run(request.send()).await??;
    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryError::HttpStatus(status.as_u16()));
    }
    Ok(())
}

/// Posts `entries` to the webhook oldest first, pausing `config.pace` between posts.
///
/// A failed post is recorded and the loop moves on. Interruption stops the loop and
/// the remaining entries are recorded as skipped.
pub async fn deliver(
    client: &reqwest::Client,
    ctx: &RunContext,
    config: &Config,
    entries: &[CandidateEntry],
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    let mut pending = entries.iter().rev().peekable();

    while let Some(entry) = pending.next() {
        let payload = NotificationPayload::for_entry(entry);
        match send_to_slack(client, ctx, &config.slack_url, &payload).await {
            Ok(()) => {
                tracing::debug!(link = %entry.link, "sent entry to slack");
                report
                    .records
                    .push(DeliveryRecord::new(entry, DeliveryStatus::Delivered));
            }
            Err(DeliveryError::Interrupted(reason)) => {
                tracing::warn!(link = %entry.link, %reason, "delivery interrupted");
                report.records.push(DeliveryRecord::new(
                    entry,
                    DeliveryStatus::Failed(reason.to_string()),
                ));
                report.interrupted = Some(reason);
                report.records.extend(
                    pending
                        .by_ref()
                        .map(|entry| DeliveryRecord::new(entry, DeliveryStatus::Skipped)),
                );
                break;
            }
            Err(error) => {
                tracing::warn!(link = %entry.link, %error, "failed to send to slack");
                report.records.push(DeliveryRecord::new(
                    entry,
                    DeliveryStatus::Failed(error.to_string()),
                ));
            }
        }

        if pending.peek().is_some() {
            if let Err(reason) = ctx.run(tokio::time::sleep(config.pace)).await {
                tracing::warn!(%reason, "delivery interrupted while pacing");
                report.interrupted = Some(reason);
                report.records.extend(
                    pending
                        .by_ref()
                        .map(|entry| DeliveryRecord::new(entry, DeliveryStatus::Skipped)),
                );
                break;
            }
        }
    }

    tracing::info!(
        delivered = report.delivered(),
        failed = report.failed(),
        "delivery finished"
    );
    report
}
