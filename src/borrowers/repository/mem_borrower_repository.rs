use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::borrowers::domain::model::BorrowerEntity;
use crate::borrowers::repository::BorrowerRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::mem::{read_lock, write_lock, MemoryDatabase};

pub(crate) struct MemBorrowerRepository {
    db: Arc<MemoryDatabase>,
}

impl MemBorrowerRepository {
    pub(crate) fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }

    fn matches(entity: &BorrowerEntity, predicate: &HashMap<String, String>) -> bool {
        predicate.iter().all(|(k, v)| {
            match k.as_str() {
                "borrower_id" => entity.borrower_id == *v,
                "email" => entity.email == *v,
                "membership_status" => entity.membership_status.to_string() == *v,
                _ => false,
            }
        })
    }
}

#[async_trait]
impl Repository<BorrowerEntity> for MemBorrowerRepository {
    async fn create(&self, entity: &BorrowerEntity) -> LibraryResult<usize> {
        let mut borrowers = write_lock(&self.db.borrowers)?;
        if borrowers.contains_key(entity.borrower_id.as_str()) {
            return Err(LibraryError::duplicate_key(
                format!("borrower {} already exists", entity.borrower_id).as_str()));
        }
        borrowers.insert(entity.borrower_id.to_string(), entity.clone());
        Ok(1)
    }

    async fn update(&self, entity: &BorrowerEntity) -> LibraryResult<usize> {
        let mut borrowers = write_lock(&self.db.borrowers)?;
        match borrowers.get(entity.borrower_id.as_str()).map(|existing| existing.version) {
            Some(version) if version == entity.version => {
                let mut updated = entity.clone();
                updated.version = entity.version + 1;
                updated.updated_at = Utc::now().naive_utc();
                borrowers.insert(entity.borrower_id.to_string(), updated);
                Ok(1)
            }
            Some(_) => Err(LibraryError::unavailable(
                format!("stale version for borrower {}", entity.borrower_id).as_str(),
                Some("conditional_check_failed".to_string()), true)),
            None => Err(LibraryError::not_found(
                format!("borrower not found for {}", entity.borrower_id).as_str())),
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowerEntity> {
        let borrowers = read_lock(&self.db.borrowers)?;
        borrowers.get(id).cloned().ok_or_else(|| {
            LibraryError::not_found(format!("borrower not found for {}", id).as_str())
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut borrowers = write_lock(&self.db.borrowers)?;
        match borrowers.remove(id) {
            Some(_) => Ok(1),
            None => Err(LibraryError::not_found(format!("borrower not found for {}", id).as_str())),
        }
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowerEntity>> {
        let borrowers = read_lock(&self.db.borrowers)?;
        let mut records = borrowers.values()
            .filter(|entity| Self::matches(entity, predicate))
            .cloned()
            .collect::<Vec<BorrowerEntity>>();
        records.sort_by(|a, b| a.borrower_id.cmp(&b.borrower_id));
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
impl BorrowerRepository for MemBorrowerRepository {
    async fn find_by_email(&self, email: &str) -> LibraryResult<Vec<BorrowerEntity>> {
        let res = self.query(
            &HashMap::from([("email".to_string(), email.to_string())]), None, 100).await?;
        Ok(res.records)
    }
}

#[cfg(test)]
mod tests {
    use crate::borrowers::domain::model::BorrowerEntity;
    use crate::borrowers::repository::BorrowerRepository;
    use crate::borrowers::repository::mem_borrower_repository::MemBorrowerRepository;
    use crate::core::library::MembershipStatus;
    use crate::core::repository::Repository;
    use crate::utils::mem::MemoryDatabase;

    #[tokio::test]
    async fn test_should_create_get_borrower() {
        let borrower_repo = MemBorrowerRepository::new(MemoryDatabase::new());
        let borrower = BorrowerEntity::new("ada@org.cc");
        let size = borrower_repo.create(&borrower).await.expect("should create borrower");
        assert_eq!(1, size);

        let loaded = borrower_repo.get(borrower.borrower_id.as_str()).await.expect("should return borrower");
        assert_eq!(borrower.borrower_id, loaded.borrower_id);
    }

    #[tokio::test]
    async fn test_should_create_update_borrower() {
        let borrower_repo = MemBorrowerRepository::new(MemoryDatabase::new());
        let mut borrower = BorrowerEntity::new("grace@org.cc");
        let _ = borrower_repo.create(&borrower).await.expect("should create borrower");

        borrower.membership_status = MembershipStatus::Suspended;
        let _ = borrower_repo.update(&borrower).await.expect("should update borrower");

        let loaded = borrower_repo.get(borrower.borrower_id.as_str()).await.expect("should return borrower");
        assert_eq!(MembershipStatus::Suspended, loaded.membership_status);
        assert_eq!(1, loaded.version);
    }

    #[tokio::test]
    async fn test_should_find_by_email() {
        let borrower_repo = MemBorrowerRepository::new(MemoryDatabase::new());
        let borrower = BorrowerEntity::new("unique@org.cc");
        let _ = borrower_repo.create(&borrower).await.expect("should create borrower");
        let other = BorrowerEntity::new("other@org.cc");
        let _ = borrower_repo.create(&other).await.expect("should create borrower");

        let found = borrower_repo.find_by_email("unique@org.cc").await.expect("should query");
        assert_eq!(1, found.len());
        assert_eq!(borrower.borrower_id, found[0].borrower_id);
    }

    #[tokio::test]
    async fn test_should_delete_borrower() {
        let borrower_repo = MemBorrowerRepository::new(MemoryDatabase::new());
        let borrower = BorrowerEntity::new("gone@org.cc");
        let _ = borrower_repo.create(&borrower).await.expect("should create borrower");
        let deleted = borrower_repo.delete(borrower.borrower_id.as_str()).await.expect("should delete borrower");
        assert_eq!(1, deleted);
        let loaded = borrower_repo.get(borrower.borrower_id.as_str()).await;
        assert!(loaded.is_err());
    }
}
