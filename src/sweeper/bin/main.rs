include!("../../lib.rs");
use std::time::Duration;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::{info, warn};
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::lending::factory::create_lending_service;
use crate::utils::ddb::setup_tracing;

// The sweep runs once a day: in production as a lambda behind an EventBridge
// schedule, in dev mode as a local interval loop.

const DEV_MODE: bool = true;
const SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

async fn run_sweep(config: &Configuration, store: RepositoryStore) -> Result<(usize, usize), Error> {
    let lending_svc = create_lending_service(config, store).await;
    let today = chrono::Utc::now().date_naive();
    let transitioned = lending_svc.sweep_overdue(today).await
        .map_err(|err| Error::from(err.to_string()))?;
    // reminders are best-effort observers; they must not fail the sweep
    let reminded = lending_svc.send_due_reminders(today).await.unwrap_or(0);
    Ok((transitioned, reminded))
}

async fn handler(_event: LambdaEvent<Value>) -> Result<Value, Error> {
    let state = AppState::new("prod", RepositoryStore::DynamoDB);
    let (transitioned, reminded) = run_sweep(&state.config, state.store).await?;
    Ok(json!({"transitioned": transitioned, "reminded": reminded}))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        let state = AppState::new("dev", RepositoryStore::LocalDynamoDB);
        let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            match run_sweep(&state.config, state.store).await {
                Ok((transitioned, reminded)) => {
                    info!("daily sweep transitioned {} loans, sent {} reminders", transitioned, reminded);
                }
                Err(err) => {
                    warn!("daily sweep failed: {}", err);
                }
            }
        }
    } else {
        run(service_fn(handler)).await
    }
}
