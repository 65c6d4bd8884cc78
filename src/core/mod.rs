pub mod config;
pub mod context;
pub mod feed;
pub mod notify;

use config::Config;
use context::RunContext;
use feed::{fetch_candidates, FetchError};
use notify::{deliver, DeliveryReport};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INTERRUPTED: u8 = 130;

const USER_AGENT: &str = concat!("redmine2slack/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to get atom feed: {0}")]
    Fetch(#[from] FetchError),
}

/// Fetches the feed once and forwards its recent entries to Slack.
#[derive(Debug, Clone)]
pub struct Redmine2Slack {
    client: reqwest::Client,
    config: Config,
}

impl Redmine2Slack {
    pub fn new(config: Config) -> Result<Self, RunError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(RunError::Client)?;
        Ok(Self { client, config })
    }

    /// Only a fetch failure fails the run; per-entry delivery failures end up in the report.
    pub async fn run(&self, ctx: &RunContext) -> Result<DeliveryReport, RunError> {
        let candidates = fetch_candidates(&self.client, ctx, &self.config).await?;
        Ok(deliver(&self.client, ctx, &self.config, &candidates).await)
    }
}

/// Process exit status for a finished run. Per-entry delivery failures still exit successfully.
pub fn exit_status(outcome: &Result<DeliveryReport, RunError>) -> u8 {
    match outcome {
        Ok(report) if report.was_interrupted() => EXIT_INTERRUPTED,
        Ok(_) => EXIT_SUCCESS,
        Err(RunError::Fetch(FetchError::Interrupted(_))) => EXIT_INTERRUPTED,
        Err(_) => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::Interrupted;
    use notify::{DeliveryRecord, DeliveryStatus};

    fn record(title: &str, status: DeliveryStatus) -> DeliveryRecord {
        DeliveryRecord {
            title: title.to_string(),
            link: format!("https://redmine.example.com/{title}"),
            status,
        }
    }

    #[test]
    fn fetch_failure_exits_with_failure() {
        let outcome = Err(RunError::Fetch(FetchError::HttpStatus(500)));
        assert_eq!(exit_status(&outcome), EXIT_FAILURE);
    }

    #[test]
    fn failed_deliveries_still_exit_successfully() {
        let outcome = Ok(DeliveryReport {
            records: vec![
                record("first", DeliveryStatus::Failed("connection refused".to_string())),
                record("second", DeliveryStatus::Delivered),
            ],
            interrupted: None,
        });
        assert_eq!(exit_status(&outcome), EXIT_SUCCESS);
        assert_eq!(exit_status(&Ok(DeliveryReport::default())), EXIT_SUCCESS);
    }

    #[test]
    fn interrupted_runs_exit_with_130() {
        let outcome = Ok(DeliveryReport {
            records: vec![
                record("first", DeliveryStatus::Failed("run was cancelled".to_string())),
                record("second", DeliveryStatus::Skipped),
            ],
            interrupted: Some(Interrupted::Cancelled),
        });
        assert_eq!(exit_status(&outcome), EXIT_INTERRUPTED);

        let outcome = Err(RunError::Fetch(FetchError::Interrupted(
            Interrupted::DeadlineExceeded,
        )));
        assert_eq!(exit_status(&outcome), EXIT_INTERRUPTED);
    }
}
