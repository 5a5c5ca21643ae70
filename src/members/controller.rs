use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::members::command::add_borrower_cmd::{AddBorrowerCommand, AddBorrowerCommandRequest, AddBorrowerCommandResponse};
use crate::members::command::get_borrower_cmd::{GetBorrowerCommand, GetBorrowerCommandRequest, GetBorrowerCommandResponse};
use crate::members::command::remove_borrower_cmd::{RemoveBorrowerCommand, RemoveBorrowerCommandRequest, RemoveBorrowerCommandResponse};
use crate::members::command::update_borrower_cmd::{UpdateBorrowerCommand, UpdateBorrowerCommandRequest, UpdateBorrowerCommandResponse};
use crate::members::domain::MemberService;
use crate::members::factory;

async fn build_service(state: AppState) -> Box<dyn MemberService> {
    factory::create_member_service(&state.config, state.store).await
}

pub(crate) async fn add_borrower(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddBorrowerCommandResponse>, ServerError> {
    let req: AddBorrowerCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = AddBorrowerCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_borrower_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>) -> Result<Json<GetBorrowerCommandResponse>, ServerError> {
    let svc = build_service(state).await;
    let res = GetBorrowerCommand::new(svc).execute(GetBorrowerCommandRequest::new(id.as_str())).await?;
    Ok(Json(res))
}

pub(crate) async fn update_borrower(
    State(state): State<AppState>,
    Path(id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBorrowerCommandResponse>, ServerError> {
    let first_name = json.0.get("first_name").and_then(Value::as_str);
    let last_name = json.0.get("last_name").and_then(Value::as_str);
    let phone = json.0.get("phone").and_then(Value::as_str);
    let membership_status = json.0.get("membership_status").and_then(Value::as_str);
    let svc = build_service(state).await;
    let res = UpdateBorrowerCommand::new(svc).execute(
        UpdateBorrowerCommandRequest::new(id.as_str(), first_name, last_name, phone, membership_status)).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_borrower(
    State(state): State<AppState>,
    Path(id): Path<String>) -> Result<Json<RemoveBorrowerCommandResponse>, ServerError> {
    let svc = build_service(state).await;
    let res = RemoveBorrowerCommand::new(svc).execute(RemoveBorrowerCommandRequest::new(id.as_str())).await?;
    Ok(Json(res))
}
