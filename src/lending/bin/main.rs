include!("../../lib.rs");
use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use crate::utils::ddb::setup_tracing;
use crate::core::controller::AppState;
use crate::core::repository::RepositoryStore;
use crate::lending::controller::{borrower_stats, close_loan, extend_loan, get_overdue, open_loan, sweep_overdue};

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let state = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        AppState::new("dev", RepositoryStore::LocalDynamoDB)
    } else {
        AppState::new("prod", RepositoryStore::DynamoDB)
    };

    let app = Router::new()
        .route("/lending/open", post(open_loan))
        .route("/lending/close", post(close_loan))
        .route("/lending/:id/extend", post(extend_loan))
        .route("/lending/sweep", post(sweep_overdue))
        .route("/lending/overdue", get(get_overdue))
        .route("/lending/borrowers/:id/statistics", get(borrower_stats))
        .with_state(state);

    run(app).await
}
