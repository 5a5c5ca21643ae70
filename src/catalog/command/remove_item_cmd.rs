use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct RemoveItemCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl RemoveItemCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveItemCommandRequest {
    item_id: String,
}

impl RemoveItemCommandRequest {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveItemCommandResponse {
    pub(crate) item_id: String,
}

impl RemoveItemCommandResponse {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
        }
    }
}

#[async_trait]
impl Command<RemoveItemCommandRequest, RemoveItemCommandResponse> for RemoveItemCommand {
    async fn execute(&self, req: RemoveItemCommandRequest) -> Result<RemoveItemCommandResponse, CommandError> {
        self.catalog_service.remove_item(req.item_id.as_str())
            .await.map_err(CommandError::from)
            .map(|_| RemoveItemCommandResponse::new(req.item_id.as_str()))
    }
}
