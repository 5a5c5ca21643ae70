use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::lending::command::borrower_stats_cmd::{BorrowerStatsCommand, BorrowerStatsCommandRequest, BorrowerStatsCommandResponse};
use crate::lending::command::close_loan_cmd::{CloseLoanCommand, CloseLoanCommandRequest, CloseLoanCommandResponse};
use crate::lending::command::extend_loan_cmd::{ExtendLoanCommand, ExtendLoanCommandRequest, ExtendLoanCommandResponse};
use crate::lending::command::get_overdue_cmd::{GetOverdueCommand, GetOverdueCommandRequest, GetOverdueCommandResponse};
use crate::lending::command::open_loan_cmd::{OpenLoanCommand, OpenLoanCommandRequest, OpenLoanCommandResponse};
use crate::lending::command::sweep_overdue_cmd::{SweepOverdueCommand, SweepOverdueCommandRequest, SweepOverdueCommandResponse};
use crate::lending::domain::LendingService;
use crate::lending::factory;
use crate::utils::date::DAY_FMT;

async fn build_service(state: AppState) -> Box<dyn LendingService> {
    factory::create_lending_service(&state.config, state.store).await
}

fn parse_day(json: &Value, field: &str) -> Option<NaiveDate> {
    json.get(field)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, DAY_FMT).ok())
}

pub(crate) async fn open_loan(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<OpenLoanCommandResponse>, ServerError> {
    let req: OpenLoanCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = OpenLoanCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn close_loan(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<CloseLoanCommandResponse>, ServerError> {
    let req: CloseLoanCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = CloseLoanCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn extend_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    json: Json<Value>) -> Result<Json<ExtendLoanCommandResponse>, ServerError> {
    let days = json.0.get("days").and_then(Value::as_i64);
    let svc = build_service(state).await;
    let res = ExtendLoanCommand::new(svc).execute(
        ExtendLoanCommandRequest::new(id.as_str(), days)).await?;
    Ok(Json(res))
}

pub(crate) async fn sweep_overdue(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<SweepOverdueCommandResponse>, ServerError> {
    let as_of = parse_day(&json.0, "as_of");
    let svc = build_service(state).await;
    let res = SweepOverdueCommand::new(svc).execute(SweepOverdueCommandRequest::new(as_of)).await?;
    Ok(Json(res))
}

pub(crate) async fn get_overdue(
    State(state): State<AppState>) -> Result<Json<GetOverdueCommandResponse>, ServerError> {
    let svc = build_service(state).await;
    let res = GetOverdueCommand::new(svc).execute(
        GetOverdueCommandRequest::new(None, None, None)).await?;
    Ok(Json(res))
}

pub(crate) async fn borrower_stats(
    State(state): State<AppState>,
    Path(id): Path<String>) -> Result<Json<BorrowerStatsCommandResponse>, ServerError> {
    let svc = build_service(state).await;
    let res = BorrowerStatsCommand::new(svc).execute(
        BorrowerStatsCommandRequest::new(id.as_str())).await?;
    Ok(Json(res))
}
