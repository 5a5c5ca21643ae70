pub(crate) mod ddb_borrower_repository;
pub(crate) mod mem_borrower_repository;

use async_trait::async_trait;
use crate::borrowers::domain::model::BorrowerEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

#[async_trait]
pub(crate) trait BorrowerRepository: Repository<BorrowerEntity> {
    async fn find_by_email(&self, email: &str) -> LibraryResult<Vec<BorrowerEntity>>;
}
