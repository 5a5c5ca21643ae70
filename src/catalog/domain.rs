use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::items::dto::ItemDto;

pub mod service;

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn add_item(&self, item: &ItemDto) -> LibraryResult<ItemDto>;
    async fn remove_item(&self, id: &str) -> LibraryResult<()>;
    async fn update_item(&self, item: &ItemDto) -> LibraryResult<ItemDto>;
    async fn find_item_by_id(&self, id: &str) -> LibraryResult<ItemDto>;
    async fn find_items_by_catalog_code(&self, catalog_code: &str) -> LibraryResult<Vec<ItemDto>>;
}
