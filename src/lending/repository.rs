pub mod ddb_loan_repository;
pub mod mem_loan_repository;

use async_trait::async_trait;
use chrono::NaiveDate;
use crate::borrowers::domain::model::BorrowerEntity;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::lending::domain::model::LoanEntity;

// LoanRepository owns the loan records plus the multi-record atomic commits
// of the lending transitions. Every commit_* call is all-or-nothing and is
// conditioned on the version each entity carried when it was read; a version
// that moved underneath rejects the whole commit with a retryable error.
#[async_trait]
pub(crate) trait LoanRepository: Repository<LoanEntity> {
    async fn find_open_by_item(&self, item_id: &str) -> LibraryResult<Option<LoanEntity>>;

    async fn find_open_by_borrower(&self, borrower_id: &str) -> LibraryResult<Vec<LoanEntity>>;

    // open records with due_date strictly before the given day
    async fn query_due_before(&self, day: NaiveDate,
                              page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>>;

    async fn query_history_by_item(&self, item_id: &str,
                                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>>;

    async fn query_history_by_borrower(&self, borrower_id: &str,
                                       page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>>;

    async fn count_open(&self) -> LibraryResult<usize>;

    async fn count_open_due_before(&self, day: NaiveDate) -> LibraryResult<usize>;

    async fn count_opened_on(&self, day: NaiveDate) -> LibraryResult<usize>;

    async fn count_closed_on(&self, day: NaiveDate) -> LibraryResult<usize>;

    // creates the loan, moves the item on loan and bumps the borrower's
    // total, provided the item is still Available at its read version
    async fn commit_open(&self, loan: &LoanEntity, item: &ItemEntity,
                         borrower: &BorrowerEntity) -> LibraryResult<()>;

    // closes the loan and returns the item to the shelf
    async fn commit_close(&self, loan: &LoanEntity, item: &ItemEntity) -> LibraryResult<()>;

    // moves the due date; item and borrower are untouched
    async fn commit_extend(&self, loan: &LoanEntity) -> LibraryResult<()>;

    // compare-and-set of loan_status to Overdue; Ok(false) means a
    // concurrent close/extend won and the record was left alone
    async fn mark_overdue(&self, loan: &LoanEntity) -> LibraryResult<bool>;
}
