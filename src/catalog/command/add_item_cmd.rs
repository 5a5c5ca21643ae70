use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::ItemStatus;
use crate::items::dto::ItemDto;

pub(crate) struct AddItemCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl AddItemCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddItemCommandRequest {
    catalog_code: String,
    title: String,
}

impl AddItemCommandRequest {
    pub fn new(catalog_code: &str, title: &str) -> Self {
        Self {
            catalog_code: catalog_code.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddItemCommandResponse {
    pub(crate) item: ItemDto,
}

impl AddItemCommandResponse {
    pub fn new(item: ItemDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<AddItemCommandRequest, AddItemCommandResponse> for AddItemCommand {
    async fn execute(&self, req: AddItemCommandRequest) -> Result<AddItemCommandResponse, CommandError> {
        let item = ItemDto::new(req.catalog_code.as_str(), req.title.as_str(), ItemStatus::Available);
        self.catalog_service.add_item(&item)
            .await.map_err(CommandError::from).map(AddItemCommandResponse::new)
    }
}
