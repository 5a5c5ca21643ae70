use std::collections::HashMap;
use async_trait::async_trait;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::library::{ItemStatus, LibraryError, LibraryResult};
use crate::gateway::events::EventPublisher;
use crate::items::domain::model::ItemEntity;
use crate::items::dto::ItemDto;
use crate::items::repository::ItemRepository;

pub(crate) struct CatalogServiceImpl {
    item_repository: Box<dyn ItemRepository>,
    events_publisher: Box<dyn EventPublisher>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration, item_repository: Box<dyn ItemRepository>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            item_repository,
            events_publisher,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_item(&self, item: &ItemDto) -> LibraryResult<ItemDto> {
        let _ = self.item_repository.create(&ItemEntity::from(item)).await.map(|_| ())?;
        let _ = self.events_publisher.publish(&DomainEvent::added(
            "items", "catalog", item.item_id.as_str(), &HashMap::new(), item)?).await?;
        Ok(item.clone())
    }

    // Removal is catalog housekeeping and must not break the lending
    // invariant: an item with an open loan stays until the loan closes.
    async fn remove_item(&self, id: &str) -> LibraryResult<()> {
        let existing = self.item_repository.get(id).await?;
        if existing.item_status == ItemStatus::OnLoan {
            return Err(LibraryError::invalid_operation(
                format!("cannot remove item {} while it is on loan", id).as_str()));
        }
        let res = self.item_repository.delete(id).await.map(|_| ())?;
        let data = id.to_string();
        let _ = self.events_publisher.publish(&DomainEvent::deleted(
            "items", "catalog", id, &HashMap::new(), &data)?).await?;
        Ok(res)
    }

    async fn update_item(&self, item: &ItemDto) -> LibraryResult<ItemDto> {
        let _ = self.item_repository.update(&ItemEntity::from(item)).await.map(|_| ())?;
        let _ = self.events_publisher.publish(&DomainEvent::updated(
            "items", "catalog", item.item_id.as_str(), &HashMap::new(), item)?).await?;
        Ok(item.clone())
    }

    async fn find_item_by_id(&self, id: &str) -> LibraryResult<ItemDto> {
        self.item_repository.get(id).await.map(|i| ItemDto::from(&i))
    }

    async fn find_items_by_catalog_code(&self, catalog_code: &str) -> LibraryResult<Vec<ItemDto>> {
        let records = self.item_repository.find_by_catalog_code(catalog_code).await?;
        Ok(records.iter().map(ItemDto::from).collect())
    }
}

impl From<&ItemEntity> for ItemDto {
    fn from(other: &ItemEntity) -> Self {
        Self {
            item_id: other.item_id.to_string(),
            version: other.version,
            shelf_code: other.shelf_code.to_string(),
            catalog_code: other.catalog_code.to_string(),
            title: other.title.to_string(),
            category: other.category.to_string(),
            item_status: other.item_status,
            acquired_at: other.acquired_at,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&ItemDto> for ItemEntity {
    fn from(other: &ItemDto) -> Self {
        Self {
            item_id: other.item_id.to_string(),
            version: other.version,
            shelf_code: other.shelf_code.to_string(),
            catalog_code: other.catalog_code.to_string(),
            title: other.title.to_string(),
            category: other.category.to_string(),
            item_status: other.item_status,
            acquired_at: other.acquired_at,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
