use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tracing::{info, warn};
use crate::borrowers::domain::model::BorrowerEntity;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::library::{ItemStatus, LibraryError, LibraryResult, LoanStatus, PaginatedResult};
use crate::gateway::events::EventPublisher;
use crate::items::domain::Item;
use crate::items::domain::model::ItemEntity;
use crate::lending::domain::LendingService;
use crate::lending::domain::model::LoanEntity;
use crate::lending::domain::penalty;
use crate::lending::dto::{BorrowerStatisticsDto, DailyLendingStatsDto, LoanDto};
use crate::lending::repository::LoanRepository;
use crate::members::Borrower;
use crate::members::domain::MemberService;

const SWEEP_PAGE_SIZE: usize = 100;

// LendingServiceImpl drives every loan-record transition. Each transition
// reads the entities it touches, validates the preconditions against those
// reads and hands the mutated records to one version-conditioned repository
// commit. A conflicting writer fails the commit; the operation then re-reads
// and retries once before giving up.
pub(crate) struct LendingServiceImpl {
    branch_id: String,
    loan_period_days: i64,
    extension_days: i64,
    daily_late_fee: f64,
    reminder_ahead_days: i64,
    loan_repository: Box<dyn LoanRepository>,
    catalog_service: Box<dyn CatalogService>,
    member_service: Box<dyn MemberService>,
    events_publisher: Box<dyn EventPublisher>,
}

impl LendingServiceImpl {
    pub(crate) fn new(config: &Configuration, loan_repository: Box<dyn LoanRepository>,
                      catalog_service: Box<dyn CatalogService>, member_service: Box<dyn MemberService>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            loan_period_days: config.loan_period_days,
            extension_days: config.extension_days,
            daily_late_fee: config.daily_late_fee,
            reminder_ahead_days: config.reminder_ahead_days,
            loan_repository,
            catalog_service,
            member_service,
            events_publisher,
        }
    }

    // The record commit is the atomic unit; events ride behind it and must
    // never fail a transition that already landed.
    async fn publish(&self, event: serde_json::Result<DomainEvent>) {
        match event {
            Ok(event) => {
                if let Err(err) = self.events_publisher.publish(&event).await {
                    warn!("failed to publish {} event: {}", event.name, err);
                }
            }
            Err(err) => {
                warn!("failed to encode domain event: {}", err);
            }
        }
    }

    async fn try_open_loan(&self, item_id: &str, borrower_id: &str) -> LibraryResult<LoanDto> {
        let item = self.catalog_service.find_item_by_id(item_id).await?;
        if !item.is_loanable() {
            return Err(LibraryError::item_unavailable(
                format!("item {} is not available for lending, status {}", item_id, item.status()).as_str()));
        }
        let borrower = self.member_service.find_borrower_by_id(borrower_id).await?;
        if !borrower.is_active() {
            return Err(LibraryError::not_eligible(
                format!("borrower {} membership is {}", borrower_id, borrower.membership_status).as_str()));
        }
        let today = Utc::now().date_naive();
        let open_loans = self.loan_repository.find_open_by_borrower(borrower_id).await?;
        if open_loans.iter().any(|l| penalty::is_overdue(l.due_date, today, l.closed)) {
            return Err(LibraryError::overdue_loans(
                format!("borrower {} has overdue loans and cannot open new ones", borrower_id).as_str()));
        }

        let loan = LoanEntity::new(self.branch_id.as_str(), item_id, borrower_id, self.loan_period_days);
        let mut item_entity = ItemEntity::from(&item);
        item_entity.item_status = ItemStatus::OnLoan;
        let mut borrower_entity = BorrowerEntity::from(&borrower);
        borrower_entity.total_loans += 1;
        self.loan_repository.commit_open(&loan, &item_entity, &borrower_entity).await?;

        info!("opened loan {} for item {} borrower {} due {}",
            loan.loan_id, item_id, borrower_id, loan.due_date);
        let dto = LoanDto::from(&loan);
        self.publish(DomainEvent::added(
            "loan_opened", "lending", loan.loan_id.as_str(), &HashMap::new(), &dto)).await;
        Ok(dto)
    }

    async fn try_close_loan(&self, item_id: &str, borrower_id: &str) -> LibraryResult<LoanDto> {
        let mut loan = self.loan_repository.find_open_by_item(item_id).await?.ok_or_else(|| {
            LibraryError::not_found(
                format!("no active loan found for item {}", item_id).as_str())
        })?;
        if loan.borrower_id != borrower_id {
            return Err(LibraryError::loan_mismatch(
                format!("loan for item {} belongs to another borrower", item_id).as_str()));
        }

        let today = Utc::now().date_naive();
        loan.return_date = Some(today);
        loan.closed = true;
        loan.loan_status = LoanStatus::Returned;
        // the fee is fixed once here, against the due date the loan ended
        // with, and never recomputed afterwards
        if penalty::is_overdue(loan.due_date, today, false) {
            loan.late_fee = penalty::late_fee(loan.due_date, today, self.daily_late_fee);
            info!("late fee {} assessed on loan {}", loan.late_fee, loan.loan_id);
        }
        let item = self.catalog_service.find_item_by_id(item_id).await?;
        let mut item_entity = ItemEntity::from(&item);
        item_entity.item_status = ItemStatus::Available;
        self.loan_repository.commit_close(&loan, &item_entity).await?;

        info!("closed loan {} for item {} borrower {}", loan.loan_id, item_id, borrower_id);
        let dto = LoanDto::from(&loan);
        self.publish(DomainEvent::deleted(
            "loan_returned", "lending", loan.loan_id.as_str(), &HashMap::new(), &dto)).await;
        Ok(dto)
    }

    async fn try_extend_loan(&self, loan_id: &str, days: i64) -> LibraryResult<LoanDto> {
        let mut loan = self.loan_repository.get(loan_id).await?;
        if loan.closed {
            return Err(LibraryError::invalid_operation(
                format!("cannot extend returned loan {}", loan_id).as_str()));
        }
        // overdue-ness comes from the dates, never from the advisory status;
        // an overdue loan must be returned before any further extension
        let today = Utc::now().date_naive();
        if penalty::is_overdue(loan.due_date, today, loan.closed) {
            return Err(LibraryError::invalid_operation(
                format!("cannot extend overdue loan {}; return it first", loan_id).as_str()));
        }

        loan.due_date = loan.due_date + Duration::days(days);
        loan.loan_status = LoanStatus::Extended;
        self.loan_repository.commit_extend(&loan).await?;

        info!("extended loan {} by {} days, now due {}", loan_id, days, loan.due_date);
        let dto = LoanDto::from(&loan);
        self.publish(DomainEvent::updated(
            "loan_extended", "lending", loan.loan_id.as_str(), &HashMap::new(), &dto)).await;
        Ok(dto)
    }
}

#[async_trait]
impl LendingService for LendingServiceImpl {
    async fn open_loan(&self, item_id: &str, borrower_id: &str) -> LibraryResult<LoanDto> {
        match self.try_open_loan(item_id, borrower_id).await {
            Err(err) if err.retryable() => {
                info!("retrying loan open for item {} after write conflict", item_id);
                self.try_open_loan(item_id, borrower_id).await.map_err(|retry_err| {
                    if retry_err.retryable() {
                        LibraryError::item_unavailable(
                            format!("item {} is not available for lending", item_id).as_str())
                    } else {
                        retry_err
                    }
                })
            }
            other => other,
        }
    }

    async fn close_loan(&self, item_id: &str, borrower_id: &str) -> LibraryResult<LoanDto> {
        match self.try_close_loan(item_id, borrower_id).await {
            Err(err) if err.retryable() => {
                info!("retrying loan close for item {} after write conflict", item_id);
                self.try_close_loan(item_id, borrower_id).await.map_err(|retry_err| {
                    if retry_err.retryable() {
                        LibraryError::invalid_operation(
                            format!("conflicting update while closing loan for item {}", item_id).as_str())
                    } else {
                        retry_err
                    }
                })
            }
            other => other,
        }
    }

    async fn extend_loan(&self, loan_id: &str, days: Option<i64>) -> LibraryResult<LoanDto> {
        let days = days.unwrap_or(self.extension_days);
        if days < 1 {
            return Err(LibraryError::validation(
                format!("extension days must be positive, got {}", days).as_str(), None));
        }
        match self.try_extend_loan(loan_id, days).await {
            Err(err) if err.retryable() => {
                info!("retrying loan extension {} after write conflict", loan_id);
                self.try_extend_loan(loan_id, days).await.map_err(|retry_err| {
                    if retry_err.retryable() {
                        LibraryError::invalid_operation(
                            format!("conflicting update while extending loan {}", loan_id).as_str())
                    } else {
                        retry_err
                    }
                })
            }
            other => other,
        }
    }

    async fn sweep_overdue(&self, as_of: NaiveDate) -> LibraryResult<usize> {
        let mut transitioned = 0;
        let mut page: Option<String> = None;
        loop {
            let res = self.loan_repository.query_due_before(
                as_of, page.as_deref(), SWEEP_PAGE_SIZE).await?;
            for loan in &res.records {
                if loan.loan_status == LoanStatus::Overdue {
                    continue;
                }
                match self.loan_repository.mark_overdue(loan).await {
                    Ok(true) => {
                        warn!("loan {} for item {} borrower {} is overdue, was due {}",
                            loan.loan_id, loan.item_id, loan.borrower_id, loan.due_date);
                        transitioned += 1;
                    }
                    Ok(false) => {
                        // a close or extend landed first; the record no
                        // longer qualifies
                    }
                    Err(err) => {
                        warn!("skipping overdue mark for loan {}: {}", loan.loan_id, err);
                    }
                }
            }
            page = res.next_page;
            if page.is_none() {
                break;
            }
        }
        info!("overdue sweep transitioned {} loans as of {}", transitioned, as_of);
        Ok(transitioned)
    }

    async fn send_due_reminders(&self, as_of: NaiveDate) -> LibraryResult<usize> {
        let horizon = as_of + Duration::days(self.reminder_ahead_days);
        let mut reminded = 0;
        let mut page: Option<String> = None;
        loop {
            let res = self.loan_repository.query_due_before(
                horizon, page.as_deref(), SWEEP_PAGE_SIZE).await?;
            for loan in &res.records {
                info!("reminder: item {} on loan {} is due {} for borrower {}",
                    loan.item_id, loan.loan_id, loan.due_date, loan.borrower_id);
                reminded += 1;
            }
            page = res.next_page;
            if page.is_none() {
                break;
            }
        }
        Ok(reminded)
    }

    async fn current_loan_for_item(&self, item_id: &str) -> LibraryResult<Option<LoanDto>> {
        let open = self.loan_repository.find_open_by_item(item_id).await?;
        Ok(open.as_ref().map(LoanDto::from))
    }

    async fn is_item_on_loan(&self, item_id: &str) -> LibraryResult<bool> {
        let open = self.loan_repository.find_open_by_item(item_id).await?;
        Ok(open.is_some())
    }

    async fn active_loans_for_borrower(&self, borrower_id: &str) -> LibraryResult<Vec<LoanDto>> {
        let _ = self.member_service.find_borrower_by_id(borrower_id).await?;
        let open = self.loan_repository.find_open_by_borrower(borrower_id).await?;
        Ok(open.iter().map(LoanDto::from).collect())
    }

    async fn loan_history_for_item(&self, item_id: &str, page: Option<&str>,
                                   page_size: usize) -> LibraryResult<PaginatedResult<LoanDto>> {
        let res = self.loan_repository.query_history_by_item(item_id, page, page_size).await?;
        let records = res.records.iter().map(LoanDto::from).collect();
        Ok(PaginatedResult::new(page, page_size, res.next_page, records))
    }

    async fn loan_history_for_borrower(&self, borrower_id: &str, page: Option<&str>,
                                       page_size: usize) -> LibraryResult<PaginatedResult<LoanDto>> {
        let _ = self.member_service.find_borrower_by_id(borrower_id).await?;
        let res = self.loan_repository.query_history_by_borrower(borrower_id, page, page_size).await?;
        let records = res.records.iter().map(LoanDto::from).collect();
        Ok(PaginatedResult::new(page, page_size, res.next_page, records))
    }

    async fn query_overdue(&self, as_of: NaiveDate, page: Option<&str>,
                           page_size: usize) -> LibraryResult<PaginatedResult<LoanDto>> {
        let res = self.loan_repository.query_due_before(as_of, page, page_size).await?;
        let records = res.records.iter().map(LoanDto::from).collect();
        Ok(PaginatedResult::new(page, page_size, res.next_page, records))
    }

    async fn borrower_statistics(&self, borrower_id: &str) -> LibraryResult<BorrowerStatisticsDto> {
        let borrower = self.member_service.find_borrower_by_id(borrower_id).await?;
        let today = Utc::now().date_naive();
        let open = self.loan_repository.find_open_by_borrower(borrower_id).await?;
        let overdue = open.iter()
            .filter(|l| penalty::is_overdue(l.due_date, today, l.closed))
            .count();
        Ok(BorrowerStatisticsDto {
            borrower_id: borrower.borrower_id.to_string(),
            full_name: borrower.full_name(),
            membership_status: borrower.membership_status,
            member_since: borrower.member_since,
            total_loans: borrower.total_loans,
            currently_held: open.len() as i64,
            currently_overdue: overdue as i64,
        })
    }

    async fn daily_stats(&self, as_of: NaiveDate) -> LibraryResult<DailyLendingStatsDto> {
        let opened = self.loan_repository.count_opened_on(as_of).await?;
        let closed = self.loan_repository.count_closed_on(as_of).await?;
        let currently_overdue = self.loan_repository.count_open_due_before(as_of).await?;
        let active_loans = self.loan_repository.count_open().await?;
        Ok(DailyLendingStatsDto {
            stats_date: as_of,
            opened: opened as i64,
            closed: closed as i64,
            currently_overdue: currently_overdue as i64,
            active_loans: active_loans as i64,
        })
    }
}

impl From<&LoanEntity> for LoanDto {
    fn from(other: &LoanEntity) -> LoanDto {
        LoanDto {
            loan_id: other.loan_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            item_id: other.item_id.to_string(),
            borrower_id: other.borrower_id.to_string(),
            loan_status: other.loan_status,
            loan_date: other.loan_date,
            due_date: other.due_date,
            return_date: other.return_date,
            closed: other.closed,
            late_fee: other.late_fee,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&LoanDto> for LoanEntity {
    fn from(other: &LoanDto) -> LoanEntity {
        LoanEntity {
            loan_id: other.loan_id.to_string(),
            version: other.version,
            branch_id: other.branch_id.to_string(),
            item_id: other.item_id.to_string(),
            borrower_id: other.borrower_id.to_string(),
            loan_status: other.loan_status,
            loan_date: other.loan_date,
            due_date: other.due_date,
            return_date: other.return_date,
            closed: other.closed,
            late_fee: other.late_fee,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, Utc};
    use crate::borrowers::repository::mem_borrower_repository::MemBorrowerRepository;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::domain::Configuration;
    use crate::core::library::{ItemStatus, LibraryError, LoanStatus, MembershipStatus};
    use crate::core::repository::Repository;
    use crate::gateway::logs::publisher::LogPublisher;
    use crate::items::dto::ItemDto;
    use crate::items::repository::mem_item_repository::MemItemRepository;
    use crate::lending::domain::LendingService;
    use crate::lending::domain::service::LendingServiceImpl;
    use crate::lending::repository::mem_loan_repository::MemLoanRepository;
    use crate::members::domain::MemberService;
    use crate::members::domain::service::MemberServiceImpl;
    use crate::members::dto::BorrowerDto;
    use crate::utils::mem::MemoryDatabase;

    fn catalog_svc(db: &Arc<MemoryDatabase>) -> Box<dyn CatalogService> {
        Box::new(CatalogServiceImpl::new(&Configuration::new("test"),
                                         Box::new(MemItemRepository::new(db.clone())),
                                         Box::new(LogPublisher::new())))
    }

    fn member_svc(db: &Arc<MemoryDatabase>) -> Box<dyn MemberService> {
        Box::new(MemberServiceImpl::new(&Configuration::new("test"),
                                        Box::new(MemBorrowerRepository::new(db.clone())),
                                        Box::new(MemLoanRepository::new(db.clone()))))
    }

    fn lending_svc(db: &Arc<MemoryDatabase>) -> Box<dyn LendingService> {
        Box::new(LendingServiceImpl::new(&Configuration::new("test"),
                                         Box::new(MemLoanRepository::new(db.clone())),
                                         catalog_svc(db),
                                         member_svc(db),
                                         Box::new(LogPublisher::new())))
    }

    async fn seed_item(db: &Arc<MemoryDatabase>, status: ItemStatus) -> ItemDto {
        let item = ItemDto::new("978-0134190440", "The Go Programming Language", status);
        catalog_svc(db).add_item(&item).await.expect("should add item")
    }

    async fn seed_borrower(db: &Arc<MemoryDatabase>, status: MembershipStatus) -> BorrowerDto {
        let mut borrower = BorrowerDto::new(format!("{}@org.cc", uuid::Uuid::new_v4()).as_str());
        borrower.first_name = "Ada".to_string();
        borrower.last_name = "Lovelace".to_string();
        borrower.membership_status = status;
        member_svc(db).add_borrower(&borrower).await.expect("should add borrower")
    }

    // moves an open loan's due date into the past, as if days had gone by
    async fn rewind_due_date(db: &Arc<MemoryDatabase>, loan_id: &str, days_back: i64) {
        let loan_repo = MemLoanRepository::new(db.clone());
        let mut loan = loan_repo.get(loan_id).await.expect("should get loan");
        loan.due_date = Utc::now().date_naive() - Duration::days(days_back);
        let _ = loan_repo.update(&loan).await.expect("should update loan");
    }

    #[tokio::test]
    async fn test_should_run_full_lending_cycle_with_late_fee() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let loan = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        assert_eq!(LoanStatus::Open, loan.loan_status);
        assert_eq!(today + Duration::days(14), loan.due_date);
        assert_eq!(ItemStatus::OnLoan,
                   catalog_svc(&db).find_item_by_id(item.item_id.as_str()).await.expect("item").item_status);
        assert_eq!(1, member_svc(&db).find_borrower_by_id(borrower.borrower_id.as_str())
            .await.expect("borrower").total_loans);

        // six days past due
        rewind_due_date(&db, loan.loan_id.as_str(), 6).await;
        let swept = lending.sweep_overdue(today).await.expect("should sweep");
        assert_eq!(1, swept);
        let again = lending.sweep_overdue(today).await.expect("should sweep");
        assert_eq!(0, again);

        let closed = lending.close_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");
        assert!(closed.closed);
        assert_eq!(LoanStatus::Returned, closed.loan_status);
        assert_eq!(Some(today), closed.return_date);
        assert_eq!(3.0, closed.late_fee);
        assert_eq!(ItemStatus::Available,
                   catalog_svc(&db).find_item_by_id(item.item_id.as_str()).await.expect("item").item_status);
    }

    #[tokio::test]
    async fn test_should_charge_no_fee_when_closed_on_time() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let _ = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let closed = lending.close_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");
        assert_eq!(0.0, closed.late_fee);
    }

    #[tokio::test]
    async fn test_should_reject_open_for_unavailable_item() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::InRepair).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let res = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::ItemUnavailable { message: _ })));
    }

    #[tokio::test]
    async fn test_should_reject_open_for_missing_item_or_borrower() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let res = lending.open_loan("no-such-item", borrower.borrower_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::NotFound { message: _ })));
        let res = lending.open_loan(item.item_id.as_str(), "no-such-borrower").await;
        assert!(matches!(res, Err(LibraryError::NotFound { message: _ })));
    }

    #[tokio::test]
    async fn test_should_reject_open_for_inactive_borrower() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        for status in [MembershipStatus::Suspended, MembershipStatus::Expired,
                       MembershipStatus::Cancelled, MembershipStatus::Pending] {
            let borrower = seed_borrower(&db, status).await;
            let res = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str()).await;
            assert!(matches!(res, Err(LibraryError::NotEligible { message: _ })));
        }
    }

    #[tokio::test]
    async fn test_should_reject_open_while_borrower_holds_overdue_loan() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let first = seed_item(&db, ItemStatus::Available).await;
        let second = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let loan = lending.open_loan(first.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        rewind_due_date(&db, loan.loan_id.as_str(), 1).await;

        // the overdue check runs off the due date even though no sweep has
        // re-labeled the record yet
        let res = lending.open_loan(second.item_id.as_str(), borrower.borrower_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::OverdueLoans { message: _ })));

        let _ = lending.close_loan(first.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");
        let _ = lending.open_loan(second.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan after settling");
    }

    #[tokio::test]
    async fn test_should_allow_open_with_current_open_loan() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let first = seed_item(&db, ItemStatus::Available).await;
        let second = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let _ = lending.open_loan(first.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        // a current, not-yet-due loan does not block further borrowing
        let _ = lending.open_loan(second.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open second loan");
    }

    #[tokio::test]
    async fn test_should_let_exactly_one_concurrent_open_win() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let first = seed_borrower(&db, MembershipStatus::Active).await;
        let second = seed_borrower(&db, MembershipStatus::Active).await;

        let (a, b) = tokio::join!(
            lending.open_loan(item.item_id.as_str(), first.borrower_id.as_str()),
            lending.open_loan(item.item_id.as_str(), second.borrower_id.as_str()));
        assert!(a.is_ok() != b.is_ok());
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser, Err(LibraryError::ItemUnavailable { message: _ })));
    }

    #[tokio::test]
    async fn test_should_reject_close_without_active_loan() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let res = lending.close_loan(item.item_id.as_str(), borrower.borrower_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::NotFound { message: _ })));
    }

    #[tokio::test]
    async fn test_should_reject_close_by_wrong_borrower() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let holder = seed_borrower(&db, MembershipStatus::Active).await;
        let stranger = seed_borrower(&db, MembershipStatus::Active).await;

        let _ = lending.open_loan(item.item_id.as_str(), holder.borrower_id.as_str())
            .await.expect("should open loan");
        let res = lending.close_loan(item.item_id.as_str(), stranger.borrower_id.as_str()).await;
        assert!(matches!(res, Err(LibraryError::LoanMismatch { message: _ })));
    }

    #[tokio::test]
    async fn test_should_extend_loan_forward() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let loan = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let extended = lending.extend_loan(loan.loan_id.as_str(), None)
            .await.expect("should extend loan");
        assert_eq!(LoanStatus::Extended, extended.loan_status);
        assert_eq!(today + Duration::days(21), extended.due_date);

        let again = lending.extend_loan(loan.loan_id.as_str(), Some(3))
            .await.expect("should extend loan again");
        assert_eq!(today + Duration::days(24), again.due_date);
    }

    #[tokio::test]
    async fn test_should_reject_extension_of_returned_loan() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let loan = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let _ = lending.close_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");
        let res = lending.extend_loan(loan.loan_id.as_str(), None).await;
        assert!(matches!(res, Err(LibraryError::InvalidOperation { message: _ })));
    }

    #[tokio::test]
    async fn test_should_reject_extension_of_overdue_loan() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let loan = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        rewind_due_date(&db, loan.loan_id.as_str(), 2).await;
        let res = lending.extend_loan(loan.loan_id.as_str(), None).await;
        assert!(matches!(res, Err(LibraryError::InvalidOperation { message: _ })));

        // settling the overdue loan and borrowing again starts a clean clock
        let _ = lending.close_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");
        let fresh = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should reopen loan");
        assert_eq!(today + Duration::days(14), fresh.due_date);
        let _ = lending.extend_loan(fresh.loan_id.as_str(), None)
            .await.expect("should extend fresh loan");
    }

    #[tokio::test]
    async fn test_should_reject_non_positive_extension() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let res = lending.extend_loan("any", Some(0)).await;
        assert!(matches!(res, Err(LibraryError::Validation { message: _, reason_code: _ })));
    }

    #[tokio::test]
    async fn test_should_sweep_only_status() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let loan_repo = MemLoanRepository::new(db.clone());
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let loan = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        rewind_due_date(&db, loan.loan_id.as_str(), 3).await;
        let before = loan_repo.get(loan.loan_id.as_str()).await.expect("should get loan");

        let swept = lending.sweep_overdue(today).await.expect("should sweep");
        assert_eq!(1, swept);

        let after = loan_repo.get(loan.loan_id.as_str()).await.expect("should get loan");
        assert_eq!(LoanStatus::Overdue, after.loan_status);
        assert_eq!(before.due_date, after.due_date);
        assert_eq!(before.late_fee, after.late_fee);
        assert_eq!(before.return_date, after.return_date);
        assert!(!after.closed);
    }

    #[tokio::test]
    async fn test_should_not_sweep_future_or_closed_loans() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let settled = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let _ = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let closed = lending.open_loan(settled.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        rewind_due_date(&db, closed.loan_id.as_str(), 4).await;
        let _ = lending.close_loan(settled.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");

        let swept = lending.sweep_overdue(today).await.expect("should sweep");
        assert_eq!(0, swept);
    }

    #[tokio::test]
    async fn test_should_send_reminders_without_mutation() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let loan_repo = MemLoanRepository::new(db.clone());
        let due_item = seed_item(&db, ItemStatus::Available).await;
        let later_item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let due_loan = lending.open_loan(due_item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        rewind_due_date(&db, due_loan.loan_id.as_str(), 0).await;
        let _ = lending.open_loan(later_item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");

        let reminded = lending.send_due_reminders(today).await.expect("should remind");
        assert_eq!(1, reminded);
        let untouched = loan_repo.get(due_loan.loan_id.as_str()).await.expect("should get loan");
        assert_eq!(LoanStatus::Open, untouched.loan_status);
        assert!(!untouched.closed);
    }

    #[tokio::test]
    async fn test_should_read_current_loan_and_history() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        assert!(lending.current_loan_for_item(item.item_id.as_str()).await.expect("query").is_none());
        assert!(!lending.is_item_on_loan(item.item_id.as_str()).await.expect("query"));

        let loan = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let current = lending.current_loan_for_item(item.item_id.as_str()).await.expect("query");
        assert_eq!(Some(loan.loan_id.to_string()), current.map(|l| l.loan_id));
        assert!(lending.is_item_on_loan(item.item_id.as_str()).await.expect("query"));
        assert_eq!(1, lending.active_loans_for_borrower(borrower.borrower_id.as_str())
            .await.expect("query").len());

        let _ = lending.close_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");
        let _ = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should reopen loan");

        let item_history = lending.loan_history_for_item(item.item_id.as_str(), None, 50)
            .await.expect("query");
        assert_eq!(2, item_history.records.len());
        let borrower_history = lending.loan_history_for_borrower(borrower.borrower_id.as_str(), None, 50)
            .await.expect("query");
        assert_eq!(2, borrower_history.records.len());
    }

    #[tokio::test]
    async fn test_should_report_borrower_statistics() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let first = seed_item(&db, ItemStatus::Available).await;
        let second = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;

        let overdue = lending.open_loan(first.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let _ = lending.open_loan(second.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        rewind_due_date(&db, overdue.loan_id.as_str(), 5).await;

        let stats = lending.borrower_statistics(borrower.borrower_id.as_str())
            .await.expect("should report stats");
        assert_eq!(2, stats.total_loans);
        assert_eq!(2, stats.currently_held);
        assert_eq!(1, stats.currently_overdue);
        assert_eq!("Ada Lovelace", stats.full_name.as_str());

        let _ = lending.close_loan(first.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");
        let stats = lending.borrower_statistics(borrower.borrower_id.as_str())
            .await.expect("should report stats");
        assert_eq!(2, stats.total_loans);
        assert_eq!(1, stats.currently_held);
        assert_eq!(0, stats.currently_overdue);
    }

    #[tokio::test]
    async fn test_should_report_daily_stats() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let first = seed_item(&db, ItemStatus::Available).await;
        let second = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let _ = lending.open_loan(first.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let _ = lending.open_loan(second.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        let _ = lending.close_loan(first.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should close loan");

        let stats = lending.daily_stats(today).await.expect("should report stats");
        assert_eq!(today, stats.stats_date);
        assert_eq!(2, stats.opened);
        assert_eq!(1, stats.closed);
        assert_eq!(1, stats.active_loans);
        assert_eq!(0, stats.currently_overdue);
    }

    #[tokio::test]
    async fn test_should_query_overdue_loans() {
        let db = MemoryDatabase::new();
        let lending = lending_svc(&db);
        let item = seed_item(&db, ItemStatus::Available).await;
        let borrower = seed_borrower(&db, MembershipStatus::Active).await;
        let today = Utc::now().date_naive();

        let loan = lending.open_loan(item.item_id.as_str(), borrower.borrower_id.as_str())
            .await.expect("should open loan");
        assert_eq!(0, lending.query_overdue(today, None, 50).await.expect("query").records.len());

        rewind_due_date(&db, loan.loan_id.as_str(), 2).await;
        let overdue = lending.query_overdue(today, None, 50).await.expect("query");
        assert_eq!(1, overdue.records.len());
        assert_eq!(loan.loan_id, overdue.records[0].loan_id);
    }
}
