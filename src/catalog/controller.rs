use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::catalog::command::add_item_cmd::{AddItemCommand, AddItemCommandRequest, AddItemCommandResponse};
use crate::catalog::command::get_item_cmd::{GetItemCommand, GetItemCommandRequest, GetItemCommandResponse};
use crate::catalog::command::remove_item_cmd::{RemoveItemCommand, RemoveItemCommandRequest, RemoveItemCommandResponse};
use crate::catalog::command::update_item_cmd::{UpdateItemCommand, UpdateItemCommandRequest, UpdateItemCommandResponse};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};

async fn build_service(state: AppState) -> Box<dyn CatalogService> {
    factory::create_catalog_service(&state.config, state.store).await
}

pub(crate) async fn add_item(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddItemCommandResponse>, ServerError> {
    let req: AddItemCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = AddItemCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_item_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>) -> Result<Json<GetItemCommandResponse>, ServerError> {
    let svc = build_service(state).await;
    let res = GetItemCommand::new(svc).execute(GetItemCommandRequest::new(id.as_str())).await?;
    Ok(Json(res))
}

pub(crate) async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateItemCommandResponse>, ServerError> {
    let title = json.0.get("title").and_then(Value::as_str);
    let category = json.0.get("category").and_then(Value::as_str);
    let item_status = json.0.get("item_status").and_then(Value::as_str);
    let svc = build_service(state).await;
    let res = UpdateItemCommand::new(svc).execute(
        UpdateItemCommandRequest::new(id.as_str(), title, category, item_status)).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>) -> Result<Json<RemoveItemCommandResponse>, ServerError> {
    let svc = build_service(state).await;
    let res = RemoveItemCommand::new(svc).execute(RemoveItemCommandRequest::new(id.as_str())).await?;
    Ok(Json(res))
}
