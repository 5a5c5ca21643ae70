use async_trait::async_trait;
use chrono::NaiveDate;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::lending::dto::{BorrowerStatisticsDto, DailyLendingStatsDto, LoanDto};

pub mod model;
pub mod penalty;
pub mod service;

// LendingService is the lending state machine: it owns every transition of a
// loan record and the item/borrower fields tied to those transitions.
#[async_trait]
pub(crate) trait LendingService: Sync + Send {
    async fn open_loan(&self, item_id: &str, borrower_id: &str) -> LibraryResult<LoanDto>;

    async fn close_loan(&self, item_id: &str, borrower_id: &str) -> LibraryResult<LoanDto>;

    // days defaults to the configured extension period
    async fn extend_loan(&self, loan_id: &str, days: Option<i64>) -> LibraryResult<LoanDto>;

    // reclassifies open, past-due records; returns how many actually moved
    async fn sweep_overdue(&self, as_of: NaiveDate) -> LibraryResult<usize>;

    // logs reminders for loans coming due; mutates nothing
    async fn send_due_reminders(&self, as_of: NaiveDate) -> LibraryResult<usize>;

    async fn current_loan_for_item(&self, item_id: &str) -> LibraryResult<Option<LoanDto>>;

    async fn is_item_on_loan(&self, item_id: &str) -> LibraryResult<bool>;

    async fn active_loans_for_borrower(&self, borrower_id: &str) -> LibraryResult<Vec<LoanDto>>;

    async fn loan_history_for_item(&self, item_id: &str, page: Option<&str>,
                                   page_size: usize) -> LibraryResult<PaginatedResult<LoanDto>>;

    async fn loan_history_for_borrower(&self, borrower_id: &str, page: Option<&str>,
                                       page_size: usize) -> LibraryResult<PaginatedResult<LoanDto>>;

    async fn query_overdue(&self, as_of: NaiveDate, page: Option<&str>,
                           page_size: usize) -> LibraryResult<PaginatedResult<LoanDto>>;

    async fn borrower_statistics(&self, borrower_id: &str) -> LibraryResult<BorrowerStatisticsDto>;

    async fn daily_stats(&self, as_of: NaiveDate) -> LibraryResult<DailyLendingStatsDto>;
}
