use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::borrowers::domain::model::BorrowerEntity;
use crate::core::library::{ItemStatus, LibraryError, LibraryResult, LoanStatus, PaginatedResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::lending::domain::model::LoanEntity;
use crate::lending::repository::LoanRepository;
use crate::utils::mem::{read_lock, write_lock, MemoryDatabase};

// In-memory twin of the DynamoDB loan repository. Multi-record commits take
// the table locks in the MemoryDatabase order (items, borrowers, loans), so
// each commit observes and mutates all records as one unit, same contract as
// the TransactWriteItems path.
pub(crate) struct MemLoanRepository {
    db: Arc<MemoryDatabase>,
}

impl MemLoanRepository {
    pub(crate) fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }

    fn matches(entity: &LoanEntity, predicate: &HashMap<String, String>) -> bool {
        predicate.iter().all(|(k, v)| {
            match k.as_str() {
                "loan_id" => entity.loan_id == *v,
                "item_id" => entity.item_id == *v,
                "borrower_id" => entity.borrower_id == *v,
                "loan_status" => entity.loan_status.to_string() == *v,
                "loan_state" => {
                    (entity.closed && v == "closed") || (!entity.closed && v == "open")
                }
                _ => false,
            }
        })
    }

    fn paginate(mut records: Vec<LoanEntity>, page: Option<&str>,
                page_size: usize) -> PaginatedResult<LoanEntity> {
        records.sort_by(|a, b| b.loan_date.cmp(&a.loan_date)
            .then_with(|| a.loan_id.cmp(&b.loan_id)));
        let offset = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
        let next_page = if offset + page_size < records.len() {
            Some((offset + page_size).to_string())
        } else {
            None
        };
        let records = records.into_iter().skip(offset).take(page_size).collect();
        PaginatedResult::new(page, page_size, next_page, records)
    }

    fn stale(kind: &str, id: &str) -> LibraryError {
        LibraryError::unavailable(
            format!("stale version for {} {}", kind, id).as_str(),
            Some("conditional_check_failed".to_string()), true)
    }
}

#[async_trait]
impl Repository<LoanEntity> for MemLoanRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let mut loans = write_lock(&self.db.loans)?;
        if loans.contains_key(entity.loan_id.as_str()) {
            return Err(LibraryError::duplicate_key(
                format!("loan {} already exists", entity.loan_id).as_str()));
        }
        loans.insert(entity.loan_id.to_string(), entity.clone());
        Ok(1)
    }

    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let mut loans = write_lock(&self.db.loans)?;
        match loans.get(entity.loan_id.as_str()).map(|existing| existing.version) {
            Some(version) if version == entity.version => {
                let mut updated = entity.clone();
                updated.version = entity.version + 1;
                updated.updated_at = Utc::now().naive_utc();
                loans.insert(entity.loan_id.to_string(), updated);
                Ok(1)
            }
            Some(_) => Err(Self::stale("loan", entity.loan_id.as_str())),
            None => Err(LibraryError::not_found(
                format!("loan not found for {}", entity.loan_id).as_str())),
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        let loans = read_lock(&self.db.loans)?;
        loans.get(id).cloned().ok_or_else(|| {
            LibraryError::not_found(format!("loan not found for {}", id).as_str())
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut loans = write_lock(&self.db.loans)?;
        match loans.remove(id) {
            Some(_) => Ok(1),
            None => Err(LibraryError::not_found(format!("loan not found for {}", id).as_str())),
        }
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        let loans = read_lock(&self.db.loans)?;
        let records = loans.values()
            .filter(|entity| Self::matches(entity, predicate))
            .cloned()
            .collect::<Vec<LoanEntity>>();
        Ok(Self::paginate(records, page, page_size))
    }
}

#[async_trait]
impl LoanRepository for MemLoanRepository {
    async fn find_open_by_item(&self, item_id: &str) -> LibraryResult<Option<LoanEntity>> {
        let loans = read_lock(&self.db.loans)?;
        let mut open = loans.values()
            .filter(|l| l.item_id == item_id && !l.closed)
            .cloned()
            .collect::<Vec<LoanEntity>>();
        if open.len() > 1 {
            return Err(LibraryError::database(
                format!("multiple open loans for item {}", item_id).as_str(), None, false));
        }
        Ok(open.pop())
    }

    async fn find_open_by_borrower(&self, borrower_id: &str) -> LibraryResult<Vec<LoanEntity>> {
        let loans = read_lock(&self.db.loans)?;
        Ok(loans.values()
            .filter(|l| l.borrower_id == borrower_id && !l.closed)
            .cloned()
            .collect())
    }

    async fn query_due_before(&self, day: NaiveDate,
                              page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        let loans = read_lock(&self.db.loans)?;
        let records = loans.values()
            .filter(|l| !l.closed && l.due_date < day)
            .cloned()
            .collect::<Vec<LoanEntity>>();
        Ok(Self::paginate(records, page, page_size))
    }

    async fn query_history_by_item(&self, item_id: &str,
                                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        self.query(&HashMap::from([("item_id".to_string(), item_id.to_string())]),
                   page, page_size).await
    }

    async fn query_history_by_borrower(&self, borrower_id: &str,
                                       page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        self.query(&HashMap::from([("borrower_id".to_string(), borrower_id.to_string())]),
                   page, page_size).await
    }

    async fn count_open(&self) -> LibraryResult<usize> {
        let loans = read_lock(&self.db.loans)?;
        Ok(loans.values().filter(|l| !l.closed).count())
    }

    async fn count_open_due_before(&self, day: NaiveDate) -> LibraryResult<usize> {
        let loans = read_lock(&self.db.loans)?;
        Ok(loans.values().filter(|l| !l.closed && l.due_date < day).count())
    }

    async fn count_opened_on(&self, day: NaiveDate) -> LibraryResult<usize> {
        let loans = read_lock(&self.db.loans)?;
        Ok(loans.values().filter(|l| l.loan_date == day).count())
    }

    async fn count_closed_on(&self, day: NaiveDate) -> LibraryResult<usize> {
        let loans = read_lock(&self.db.loans)?;
        Ok(loans.values().filter(|l| l.return_date == Some(day)).count())
    }

    async fn commit_open(&self, loan: &LoanEntity, item: &ItemEntity,
                         borrower: &BorrowerEntity) -> LibraryResult<()> {
        let now = Utc::now().naive_utc();
        let mut items = write_lock(&self.db.items)?;
        let mut borrowers = write_lock(&self.db.borrowers)?;
        let mut loans = write_lock(&self.db.loans)?;

        let stored_item = items.get(item.item_id.as_str()).ok_or_else(|| {
            LibraryError::not_found(format!("item not found for {}", item.item_id).as_str())
        })?;
        if stored_item.version != item.version || stored_item.item_status != ItemStatus::Available {
            return Err(Self::stale("item", item.item_id.as_str()));
        }
        let stored_borrower = borrowers.get(borrower.borrower_id.as_str()).ok_or_else(|| {
            LibraryError::not_found(format!("borrower not found for {}", borrower.borrower_id).as_str())
        })?;
        if stored_borrower.version != borrower.version {
            return Err(Self::stale("borrower", borrower.borrower_id.as_str()));
        }
        if loans.contains_key(loan.loan_id.as_str()) {
            return Err(LibraryError::duplicate_key(
                format!("loan {} already exists", loan.loan_id).as_str()));
        }

        let mut new_item = item.clone();
        new_item.version = item.version + 1;
        new_item.updated_at = now;
        items.insert(item.item_id.to_string(), new_item);

        let mut new_borrower = borrower.clone();
        new_borrower.version = borrower.version + 1;
        new_borrower.updated_at = now;
        borrowers.insert(borrower.borrower_id.to_string(), new_borrower);

        loans.insert(loan.loan_id.to_string(), loan.clone());
        Ok(())
    }

    async fn commit_close(&self, loan: &LoanEntity, item: &ItemEntity) -> LibraryResult<()> {
        let now = Utc::now().naive_utc();
        let mut items = write_lock(&self.db.items)?;
        let mut loans = write_lock(&self.db.loans)?;

        let stored_item = items.get(item.item_id.as_str()).ok_or_else(|| {
            LibraryError::not_found(format!("item not found for {}", item.item_id).as_str())
        })?;
        if stored_item.version != item.version {
            return Err(Self::stale("item", item.item_id.as_str()));
        }
        let stored_loan = loans.get(loan.loan_id.as_str()).ok_or_else(|| {
            LibraryError::not_found(format!("loan not found for {}", loan.loan_id).as_str())
        })?;
        if stored_loan.version != loan.version || stored_loan.closed {
            return Err(Self::stale("loan", loan.loan_id.as_str()));
        }

        let mut new_item = item.clone();
        new_item.version = item.version + 1;
        new_item.updated_at = now;
        items.insert(item.item_id.to_string(), new_item);

        let mut new_loan = loan.clone();
        new_loan.version = loan.version + 1;
        new_loan.updated_at = now;
        loans.insert(loan.loan_id.to_string(), new_loan);
        Ok(())
    }

    async fn commit_extend(&self, loan: &LoanEntity) -> LibraryResult<()> {
        let now = Utc::now().naive_utc();
        let mut loans = write_lock(&self.db.loans)?;
        let stored_loan = loans.get(loan.loan_id.as_str()).ok_or_else(|| {
            LibraryError::not_found(format!("loan not found for {}", loan.loan_id).as_str())
        })?;
        if stored_loan.version != loan.version || stored_loan.closed {
            return Err(Self::stale("loan", loan.loan_id.as_str()));
        }
        let mut new_loan = loan.clone();
        new_loan.version = loan.version + 1;
        new_loan.updated_at = now;
        loans.insert(loan.loan_id.to_string(), new_loan);
        Ok(())
    }

    async fn mark_overdue(&self, loan: &LoanEntity) -> LibraryResult<bool> {
        let now = Utc::now().naive_utc();
        let mut loans = write_lock(&self.db.loans)?;
        match loans.get(loan.loan_id.as_str()).cloned() {
            Some(stored) if stored.version == loan.version && !stored.closed => {
                let mut marked = stored;
                marked.loan_status = LoanStatus::Overdue;
                marked.version = loan.version + 1;
                marked.updated_at = now;
                loans.insert(loan.loan_id.to_string(), marked);
                Ok(true)
            }
            // the record moved underneath the sweep; leave it alone
            _ => Ok(false),
        }
    }
}
