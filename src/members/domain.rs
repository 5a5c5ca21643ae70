use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::members::dto::BorrowerDto;

pub mod service;

#[async_trait]
pub(crate) trait MemberService: Sync + Send {
    async fn add_borrower(&self, borrower: &BorrowerDto) -> LibraryResult<BorrowerDto>;
    async fn remove_borrower(&self, id: &str) -> LibraryResult<()>;
    async fn update_borrower(&self, borrower: &BorrowerDto) -> LibraryResult<BorrowerDto>;
    async fn find_borrower_by_id(&self, id: &str) -> LibraryResult<BorrowerDto>;
    async fn find_borrower_by_email(&self, email: &str) -> LibraryResult<Vec<BorrowerDto>>;
}
