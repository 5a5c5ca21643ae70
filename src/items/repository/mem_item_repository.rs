use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::utils::mem::{read_lock, write_lock, MemoryDatabase};

// In-memory twin of the DynamoDB repository with the same version-checked
// write discipline, backing RepositoryStore::InMemory.
pub(crate) struct MemItemRepository {
    db: Arc<MemoryDatabase>,
}

impl MemItemRepository {
    pub(crate) fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }

    fn matches(entity: &ItemEntity, predicate: &HashMap<String, String>) -> bool {
        predicate.iter().all(|(k, v)| {
            match k.as_str() {
                "item_id" => entity.item_id == *v,
                "catalog_code" => entity.catalog_code == *v,
                "item_status" => entity.item_status.to_string() == *v,
                "category" => entity.category == *v,
                "title" => entity.title == *v,
                _ => false,
            }
        })
    }
}

#[async_trait]
impl Repository<ItemEntity> for MemItemRepository {
    async fn create(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        let mut items = write_lock(&self.db.items)?;
        if items.contains_key(entity.item_id.as_str()) {
            return Err(LibraryError::duplicate_key(
                format!("item {} already exists", entity.item_id).as_str()));
        }
        items.insert(entity.item_id.to_string(), entity.clone());
        Ok(1)
    }

    async fn update(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        let mut items = write_lock(&self.db.items)?;
        match items.get(entity.item_id.as_str()).map(|existing| existing.version) {
            Some(version) if version == entity.version => {
                let mut updated = entity.clone();
                updated.version = entity.version + 1;
                updated.updated_at = Utc::now().naive_utc();
                items.insert(entity.item_id.to_string(), updated);
                Ok(1)
            }
            Some(_) => Err(LibraryError::unavailable(
                format!("stale version for item {}", entity.item_id).as_str(),
                Some("conditional_check_failed".to_string()), true)),
            None => Err(LibraryError::not_found(
                format!("item not found for {}", entity.item_id).as_str())),
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<ItemEntity> {
        let items = read_lock(&self.db.items)?;
        items.get(id).cloned().ok_or_else(|| {
            LibraryError::not_found(format!("item not found for {}", id).as_str())
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut items = write_lock(&self.db.items)?;
        match items.remove(id) {
            Some(_) => Ok(1),
            None => Err(LibraryError::not_found(format!("item not found for {}", id).as_str())),
        }
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<ItemEntity>> {
        let items = read_lock(&self.db.items)?;
        let mut records = items.values()
            .filter(|entity| Self::matches(entity, predicate))
            .cloned()
            .collect::<Vec<ItemEntity>>();
        records.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        let offset = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
        let next_page = if offset + page_size < records.len() {
            Some((offset + page_size).to_string())
        } else {
            None
        };
        let records = records.into_iter().skip(offset).take(page_size).collect();
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

#[async_trait]
impl ItemRepository for MemItemRepository {
    async fn find_by_catalog_code(&self, catalog_code: &str) -> LibraryResult<Vec<ItemEntity>> {
        let res = self.query(
            &HashMap::from([("catalog_code".to_string(), catalog_code.to_string())]), None, 100).await?;
        Ok(res.records)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::core::library::{ItemStatus, LibraryError};
    use crate::core::repository::Repository;
    use crate::items::domain::model::ItemEntity;
    use crate::items::repository::ItemRepository;
    use crate::items::repository::mem_item_repository::MemItemRepository;
    use crate::utils::mem::MemoryDatabase;

    #[tokio::test]
    async fn test_should_create_get_item() {
        let item_repo = MemItemRepository::new(MemoryDatabase::new());
        let item = ItemEntity::new("978-1", "a title", ItemStatus::Available);
        let size = item_repo.create(&item).await.expect("should create item");
        assert_eq!(1, size);

        let loaded = item_repo.get(item.item_id.as_str()).await.expect("should return item");
        assert_eq!(item.item_id, loaded.item_id);
    }

    #[tokio::test]
    async fn test_should_not_create_duplicate_item() {
        let item_repo = MemItemRepository::new(MemoryDatabase::new());
        let item = ItemEntity::new("978-1", "a title", ItemStatus::Available);
        let _ = item_repo.create(&item).await.expect("should create item");
        let res = item_repo.create(&item).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { message: _ })));
    }

    #[tokio::test]
    async fn test_should_create_update_item() {
        let item_repo = MemItemRepository::new(MemoryDatabase::new());
        let mut item = ItemEntity::new("978-2", "a title", ItemStatus::Available);
        let _ = item_repo.create(&item).await.expect("should create item");

        item.item_status = ItemStatus::InRepair;
        let size = item_repo.update(&item).await.expect("should update item");
        assert_eq!(1, size);

        let loaded = item_repo.get(item.item_id.as_str()).await.expect("should return item");
        assert_eq!(ItemStatus::InRepair, loaded.item_status);
        assert_eq!(1, loaded.version);
    }

    #[tokio::test]
    async fn test_should_reject_stale_version_update() {
        let item_repo = MemItemRepository::new(MemoryDatabase::new());
        let mut item = ItemEntity::new("978-3", "a title", ItemStatus::Available);
        let _ = item_repo.create(&item).await.expect("should create item");
        let _ = item_repo.update(&item).await.expect("should update item");

        // version is stale now, the stored record moved to version 1
        item.item_status = ItemStatus::Lost;
        let res = item_repo.update(&item).await;
        match res {
            Err(err) => assert!(err.retryable()),
            Ok(_) => panic!("stale update should fail"),
        }
    }

    #[tokio::test]
    async fn test_should_query_by_catalog_code() {
        let item_repo = MemItemRepository::new(MemoryDatabase::new());
        for _i in 0..3 {
            let item = ItemEntity::new("978-42", "same work", ItemStatus::Available);
            let _ = item_repo.create(&item).await.expect("should create item");
        }
        let other = ItemEntity::new("978-43", "another work", ItemStatus::Available);
        let _ = item_repo.create(&other).await.expect("should create item");

        let found = item_repo.find_by_catalog_code("978-42").await.expect("should query");
        assert_eq!(3, found.len());
    }

    #[tokio::test]
    async fn test_should_paginate_query() {
        let item_repo = MemItemRepository::new(MemoryDatabase::new());
        for _i in 0..5 {
            let item = ItemEntity::new("978-44", "same work", ItemStatus::Available);
            let _ = item_repo.create(&item).await.expect("should create item");
        }
        let predicate = HashMap::from([("catalog_code".to_string(), "978-44".to_string())]);
        let first = item_repo.query(&predicate, None, 2).await.expect("should query");
        assert_eq!(2, first.records.len());
        let second = item_repo.query(&predicate, first.next_page.as_deref(), 2).await.expect("should query");
        assert_eq!(2, second.records.len());
        let third = item_repo.query(&predicate, second.next_page.as_deref(), 2).await.expect("should query");
        assert_eq!(1, third.records.len());
        assert_eq!(None, third.next_page);
    }
}
