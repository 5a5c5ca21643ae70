use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::items::dto::ItemDto;

pub(crate) struct GetItemCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl GetItemCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetItemCommandRequest {
    item_id: String,
}

impl GetItemCommandRequest {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetItemCommandResponse {
    pub(crate) item: ItemDto,
}

impl GetItemCommandResponse {
    pub fn new(item: ItemDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<GetItemCommandRequest, GetItemCommandResponse> for GetItemCommand {
    async fn execute(&self, req: GetItemCommandRequest) -> Result<GetItemCommandResponse, CommandError> {
        self.catalog_service.find_item_by_id(req.item_id.as_str())
            .await.map_err(CommandError::from).map(GetItemCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::catalog::command::add_item_cmd::{AddItemCommand, AddItemCommandRequest};
    use crate::catalog::command::get_item_cmd::{GetItemCommand, GetItemCommandRequest};
    use crate::catalog::factory::create_catalog_service;
    use crate::core::command::Command;
    use crate::core::command::CommandError;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref ADD_CMD : AsyncOnce<AddItemCommand> = AsyncOnce::new(async {
                let svc = create_catalog_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AddItemCommand::new(svc)
            });
        static ref GET_CMD : AsyncOnce<GetItemCommand> = AsyncOnce::new(async {
                let svc = create_catalog_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                GetItemCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_get_item() {
        let add_cmd: &AddItemCommand = ADD_CMD.get().await;
        let get_cmd: &GetItemCommand = GET_CMD.get().await;
        let added = add_cmd.execute(AddItemCommandRequest::new("978-0135957059", "The Pragmatic Programmer"))
            .await.expect("should add item");
        let res = get_cmd.execute(GetItemCommandRequest::new(added.item.item_id.as_str()))
            .await.expect("should get item");
        assert_eq!(added.item.item_id, res.item.item_id);
    }

    #[tokio::test]
    async fn test_should_fail_get_for_unknown_item() {
        let get_cmd: &GetItemCommand = GET_CMD.get().await;
        let res = get_cmd.execute(GetItemCommandRequest::new("no-such-item")).await;
        assert!(matches!(res, Err(CommandError::NotFound { message: _ })));
    }
}
