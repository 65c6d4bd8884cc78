use std::process::ExitCode;

use redmine2slack::core::feed::FetchError;
use redmine2slack::{
    exit_status, logging, resolve_config_path, Config, Redmine2Slack, RunContext, RunError,
};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");

    let arg = std::env::args().nth(1);
    let config = match resolve_config_path(arg.as_deref()).and_then(|path| Config::load(&path)) {
        Ok(config) => config,
        Err(error) => {
            logging::init("info");
            tracing::error!(%error, "failed to load config");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.logging.level);

    let app = match Redmine2Slack::new(config) {
        Ok(app) => app,
        Err(error) => {
            tracing::error!(%error, "failed to start");
            return ExitCode::FAILURE;
        }
    };

    let (ctx, cancel) = RunContext::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling run");
            cancel.cancel();
        }
    });

    let outcome = app.run(&ctx).await;
    match &outcome {
        Ok(report) if report.was_interrupted() => {
            tracing::warn!(
                delivered = report.delivered(),
                "run interrupted before all entries were sent"
            );
        }
        Ok(report) if report.failed() > 0 => {
            tracing::warn!(failed = report.failed(), "some entries could not be sent");
        }
        Ok(_) => {}
        Err(RunError::Fetch(FetchError::Interrupted(reason))) => {
            tracing::warn!(%reason, "run interrupted while fetching feed");
        }
        Err(error) => {
            tracing::error!(%error, "failed to run");
        }
    }
    ExitCode::from(exit_status(&outcome))
}
