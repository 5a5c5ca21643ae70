use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::ItemStatus;
use crate::items::dto::ItemDto;

pub(crate) struct UpdateItemCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl UpdateItemCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// Only the editable catalog fields travel in; availability stays under the
// lending state machine except for shelf-side states set here.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateItemCommandRequest {
    item_id: String,
    title: Option<String>,
    category: Option<String>,
    item_status: Option<String>,
}

impl UpdateItemCommandRequest {
    pub fn new(item_id: &str, title: Option<&str>, category: Option<&str>, item_status: Option<&str>) -> Self {
        Self {
            item_id: item_id.to_string(),
            title: title.map(str::to_string),
            category: category.map(str::to_string),
            item_status: item_status.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateItemCommandResponse {
    pub(crate) item: ItemDto,
}

impl UpdateItemCommandResponse {
    pub fn new(item: ItemDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<UpdateItemCommandRequest, UpdateItemCommandResponse> for UpdateItemCommand {
    async fn execute(&self, req: UpdateItemCommandRequest) -> Result<UpdateItemCommandResponse, CommandError> {
        let mut item = self.catalog_service.find_item_by_id(req.item_id.as_str())
            .await.map_err(CommandError::from)?;
        if let Some(title) = &req.title {
            item.title = title.to_string();
        }
        if let Some(category) = &req.category {
            item.category = category.to_string();
        }
        if let Some(item_status) = &req.item_status {
            item.item_status = ItemStatus::from(item_status.to_string());
        }
        self.catalog_service.update_item(&item)
            .await.map_err(CommandError::from).map(UpdateItemCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::catalog::command::add_item_cmd::{AddItemCommand, AddItemCommandRequest};
    use crate::catalog::command::update_item_cmd::{UpdateItemCommand, UpdateItemCommandRequest};
    use crate::catalog::factory::create_catalog_service;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref ADD_CMD : AsyncOnce<AddItemCommand> = AsyncOnce::new(async {
                let svc = create_catalog_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AddItemCommand::new(svc)
            });
        static ref UPDATE_CMD : AsyncOnce<UpdateItemCommand> = AsyncOnce::new(async {
                let svc = create_catalog_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                UpdateItemCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_update_item() {
        let add_cmd: &AddItemCommand = ADD_CMD.get().await;
        let update_cmd: &UpdateItemCommand = UPDATE_CMD.get().await;
        let added = add_cmd.execute(AddItemCommandRequest::new("978-0132350884", "Clean Code"))
            .await.expect("should add item");
        let res = update_cmd.execute(UpdateItemCommandRequest::new(
            added.item.item_id.as_str(), None, Some("software"), None))
            .await.expect("should update item");
        assert_eq!("software", res.item.category.as_str());
        assert_eq!("Clean Code", res.item.title.as_str());
    }
}
