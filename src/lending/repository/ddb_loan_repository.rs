use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::{AttributeValue, Put, Select, TransactWriteItem, Update};
use chrono::{NaiveDate, Utc};

use crate::borrowers::domain::model::BorrowerEntity;
use crate::core::library::{ItemStatus, LibraryError, LibraryResult, LoanStatus, PaginatedResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::lending::domain::model::LoanEntity;
use crate::lending::repository::LoanRepository;
use crate::utils::ddb::{add_filter_expr, from_ddb, opt_string_day, parse_bool_attribute, parse_date_attribute, parse_day_attribute, parse_float_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, string_day, to_ddb_page};

pub(crate) const ITEM_NDX: &str = "loans_item_ndx";
pub(crate) const BORROWER_NDX: &str = "loans_borrower_ndx";
pub(crate) const STATE_NDX: &str = "loans_state_ndx";

const OPEN_STATE: &str = "open";
const CLOSED_STATE: &str = "closed";

// DDBLoanRepository keeps loan records in a table with three GSIs (by item,
// by borrower, by open-state ordered on due date) and runs the lending
// transitions as TransactWriteItems so they land all-or-nothing.
#[derive(Debug)]
pub(crate) struct DDBLoanRepository {
    client: Client,
    table_name: String,
    items_table_name: String,
    borrowers_table_name: String,
}

impl DDBLoanRepository {
    pub(crate) fn new(client: Client, table_name: &str,
                      items_table_name: &str, borrowers_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            items_table_name: items_table_name.to_string(),
            borrowers_table_name: borrowers_table_name.to_string(),
        }
    }

    // loan_state denormalizes the closed flag into a string the GSI can key on
    fn loan_state(closed: bool) -> &'static str {
        if closed { CLOSED_STATE } else { OPEN_STATE }
    }

    fn loan_item_map(entity: &LoanEntity) -> LibraryResult<HashMap<String, AttributeValue>> {
        let val = serde_json::to_value(entity)?;
        let mut map = parse_item(val)?;
        map.insert("loan_state".to_string(),
                   AttributeValue::S(Self::loan_state(entity.closed).to_string()));
        Ok(map)
    }

    fn item_on_loan_update(&self, item: &ItemEntity) -> Update {
        let now = Utc::now().naive_utc();
        Update::builder()
            .table_name(self.items_table_name.as_str())
            .key("item_id", AttributeValue::S(item.item_id.clone()))
            .update_expression("SET version = :version, item_status = :item_status, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(item.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((item.version + 1).to_string()))
            .expression_attribute_values(":item_status", AttributeValue::S(item.item_status.to_string()))
            .expression_attribute_values(":available", AttributeValue::S(ItemStatus::Available.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("version = :old_version AND item_status = :available")
            .build()
    }

    fn item_returned_update(&self, item: &ItemEntity) -> Update {
        let now = Utc::now().naive_utc();
        Update::builder()
            .table_name(self.items_table_name.as_str())
            .key("item_id", AttributeValue::S(item.item_id.clone()))
            .update_expression("SET version = :version, item_status = :item_status, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(item.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((item.version + 1).to_string()))
            .expression_attribute_values(":item_status", AttributeValue::S(item.item_status.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("version = :old_version")
            .build()
    }

    async fn query_count(&self, index_name: &str, key_cond: &str,
                         values: Vec<(String, AttributeValue)>) -> LibraryResult<usize> {
        let mut total = 0usize;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let mut request = self.client
                .query()
                .table_name(self.table_name.as_str())
                .index_name(index_name)
                .select(Select::Count)
                .key_condition_expression(key_cond)
                .set_exclusive_start_key(start_key.clone());
            for (k, v) in &values {
                request = request.expression_attribute_values(k.as_str(), v.clone());
            }
            let resp = request.send().await.map_err(LibraryError::from)?;
            total += resp.count() as usize;
            match resp.last_evaluated_key() {
                Some(key) => { start_key = Some(key.clone()); }
                None => { break; }
            }
        }
        Ok(total)
    }

    async fn scan_count(&self, filter_expr: &str,
                        values: Vec<(String, AttributeValue)>) -> LibraryResult<usize> {
        let mut total = 0usize;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(self.table_name.as_str())
                .select(Select::Count)
                .filter_expression(filter_expr)
                .set_exclusive_start_key(start_key.clone());
            for (k, v) in &values {
                request = request.expression_attribute_values(k.as_str(), v.clone());
            }
            let resp = request.send().await.map_err(LibraryError::from)?;
            total += resp.count() as usize;
            match resp.last_evaluated_key() {
                Some(key) => { start_key = Some(key.clone()); }
                None => { break; }
            }
        }
        Ok(total)
    }
}

#[async_trait]
impl Repository<LoanEntity> for DDBLoanRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(loan_id)")
            .set_item(Some(Self::loan_item_map(entity)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("loan_id", AttributeValue::S(entity.loan_id.clone()))
            .update_expression("SET version = :version, loan_status = :loan_status, due_date = :due_date, return_date = :return_date, closed = :closed, loan_state = :loan_state, late_fee = :late_fee, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":loan_status", AttributeValue::S(entity.loan_status.to_string()))
            .expression_attribute_values(":due_date", string_day(entity.due_date))
            .expression_attribute_values(":return_date", opt_string_day(entity.return_date))
            .expression_attribute_values(":closed", AttributeValue::Bool(entity.closed))
            .expression_attribute_values(":loan_state", AttributeValue::S(Self::loan_state(entity.closed).to_string()))
            .expression_attribute_values(":late_fee", AttributeValue::N(entity.late_fee.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .key("loan_id", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(map) = req.item() {
                Ok(LoanEntity::from(map))
            } else {
                Err(LibraryError::not_found(format!("loan not found for {}", id).as_str()))
            }
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("loan_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, predicate);
        let (index_name, key_attr) = if predicate.contains_key("item_id") {
            (ITEM_NDX, "item_id")
        } else if predicate.contains_key("borrower_id") {
            (BORROWER_NDX, "borrower_id")
        } else {
            (STATE_NDX, "loan_state")
        };
        let key_val = predicate.get(key_attr)
            .map(|v| v.to_string())
            .unwrap_or_else(|| OPEN_STATE.to_string());
        let mut key_cond = format!("{} = :{}", key_attr, key_attr);
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .expression_attribute_values(format!(":{}", key_attr).as_str(), AttributeValue::S(key_val));
        // due_date is the state index range key, so it belongs in the key
        // condition, not a filter
        if index_name == STATE_NDX {
            if let Some(due_before) = predicate.get("due_date:<") {
                key_cond.push_str(" AND due_date < :due_date");
                request = request.expression_attribute_values(":due_date", AttributeValue::S(due_before.to_string()));
            }
        }
        request = request.key_condition_expression(key_cond);
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != key_attr && !(index_name == STATE_NDX && k == "due_date:<") {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(LoanEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl LoanRepository for DDBLoanRepository {
    async fn find_open_by_item(&self, item_id: &str) -> LibraryResult<Option<LoanEntity>> {
        let res = self.query(
            &HashMap::from([("item_id".to_string(), item_id.to_string()),
                ("loan_state".to_string(), OPEN_STATE.to_string())]), None, 10).await?;
        let mut open = res.records;
        if open.len() > 1 {
            return Err(LibraryError::database(
                format!("multiple open loans for item {}", item_id).as_str(), None, false));
        }
        Ok(open.pop())
    }

    async fn find_open_by_borrower(&self, borrower_id: &str) -> LibraryResult<Vec<LoanEntity>> {
        let res = self.query(
            &HashMap::from([("borrower_id".to_string(), borrower_id.to_string()),
                ("loan_state".to_string(), OPEN_STATE.to_string())]), None, 100).await?;
        Ok(res.records)
    }

    async fn query_due_before(&self, day: NaiveDate,
                              page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        let predicate = HashMap::from([
            ("loan_state".to_string(), OPEN_STATE.to_string()),
            ("due_date:<".to_string(), string_day(day).as_s().unwrap_or(&"0".to_string()).to_string()),
        ]);
        self.query(&predicate, page, page_size).await
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
        self.query_count(STATE_NDX, "loan_state = :loan_state",
                         vec![(":loan_state".to_string(), AttributeValue::S(OPEN_STATE.to_string()))]).await
    }

    async fn count_open_due_before(&self, day: NaiveDate) -> LibraryResult<usize> {
        self.query_count(STATE_NDX, "loan_state = :loan_state AND due_date < :due_date",
                         vec![(":loan_state".to_string(), AttributeValue::S(OPEN_STATE.to_string())),
                              (":due_date".to_string(), string_day(day))]).await
    }

    async fn count_opened_on(&self, day: NaiveDate) -> LibraryResult<usize> {
        self.scan_count("loan_date = :loan_date",
                        vec![(":loan_date".to_string(), string_day(day))]).await
    }

    async fn count_closed_on(&self, day: NaiveDate) -> LibraryResult<usize> {
        self.scan_count("return_date = :return_date",
                        vec![(":return_date".to_string(), string_day(day))]).await
    }

    async fn commit_open(&self, loan: &LoanEntity, item: &ItemEntity,
                         borrower: &BorrowerEntity) -> LibraryResult<()> {
        let now = Utc::now().naive_utc();
        let put_loan = Put::builder()
            .table_name(self.table_name.as_str())
            .set_item(Some(Self::loan_item_map(loan)?))
            .condition_expression("attribute_not_exists(loan_id)")
            .build();
        let update_borrower = Update::builder()
            .table_name(self.borrowers_table_name.as_str())
            .key("borrower_id", AttributeValue::S(borrower.borrower_id.clone()))
            .update_expression("SET version = :version, total_loans = :total_loans, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(borrower.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((borrower.version + 1).to_string()))
            .expression_attribute_values(":total_loans", AttributeValue::N(borrower.total_loans.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("version = :old_version")
            .build();
        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(put_loan).build())
            .transact_items(TransactWriteItem::builder().update(self.item_on_loan_update(item)).build())
            .transact_items(TransactWriteItem::builder().update(update_borrower).build())
            .send()
            .await.map(|_| ()).map_err(LibraryError::from)
    }

    async fn commit_close(&self, loan: &LoanEntity, item: &ItemEntity) -> LibraryResult<()> {
        let now = Utc::now().naive_utc();
        let update_loan = Update::builder()
            .table_name(self.table_name.as_str())
            .key("loan_id", AttributeValue::S(loan.loan_id.clone()))
            .update_expression("SET version = :version, loan_status = :loan_status, return_date = :return_date, closed = :new_closed, loan_state = :loan_state, late_fee = :late_fee, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(loan.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((loan.version + 1).to_string()))
            .expression_attribute_values(":loan_status", AttributeValue::S(loan.loan_status.to_string()))
            .expression_attribute_values(":return_date", opt_string_day(loan.return_date))
            .expression_attribute_values(":new_closed", AttributeValue::Bool(true))
            .expression_attribute_values(":loan_state", AttributeValue::S(CLOSED_STATE.to_string()))
            .expression_attribute_values(":late_fee", AttributeValue::N(loan.late_fee.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .expression_attribute_values(":open_flag", AttributeValue::Bool(false))
            .condition_expression("version = :old_version AND closed = :open_flag")
            .build();
        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().update(update_loan).build())
            .transact_items(TransactWriteItem::builder().update(self.item_returned_update(item)).build())
            .send()
            .await.map(|_| ()).map_err(LibraryError::from)
    }

    async fn commit_extend(&self, loan: &LoanEntity) -> LibraryResult<()> {
        let now = Utc::now().naive_utc();
        self.client
            .update_item()
            .table_name(self.table_name.as_str())
            .key("loan_id", AttributeValue::S(loan.loan_id.clone()))
            .update_expression("SET version = :version, loan_status = :loan_status, due_date = :due_date, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(loan.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((loan.version + 1).to_string()))
            .expression_attribute_values(":loan_status", AttributeValue::S(loan.loan_status.to_string()))
            .expression_attribute_values(":due_date", string_day(loan.due_date))
            .expression_attribute_values(":updated_at", string_date(now))
            .expression_attribute_values(":open_flag", AttributeValue::Bool(false))
            .condition_expression("version = :old_version AND closed = :open_flag")
            .send()
            .await.map(|_| ()).map_err(LibraryError::from)
    }

    async fn mark_overdue(&self, loan: &LoanEntity) -> LibraryResult<bool> {
        let now = Utc::now().naive_utc();
        let res = self.client
            .update_item()
            .table_name(self.table_name.as_str())
            .key("loan_id", AttributeValue::S(loan.loan_id.clone()))
            .update_expression("SET version = :version, loan_status = :loan_status, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(loan.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((loan.version + 1).to_string()))
            .expression_attribute_values(":loan_status", AttributeValue::S(LoanStatus::Overdue.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .expression_attribute_values(":open_flag", AttributeValue::Bool(false))
            .condition_expression("version = :old_version AND closed = :open_flag")
            .send()
            .await;
        match res {
            Ok(_) => Ok(true),
            Err(err) => {
                // a failed condition means a close/extend landed first
                if let SdkError::ServiceError(ctx) = &err {
                    if ctx.err().is_conditional_check_failed_exception() {
                        return Ok(false);
                    }
                }
                Err(LibraryError::from(err))
            }
        }
    }
}

impl From<&HashMap<String, AttributeValue>> for LoanEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        LoanEntity {
            loan_id: parse_string_attribute("loan_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            branch_id: parse_string_attribute("branch_id", map).unwrap_or_else(|| String::from("")),
            item_id: parse_string_attribute("item_id", map).unwrap_or_else(|| String::from("")),
            borrower_id: parse_string_attribute("borrower_id", map).unwrap_or_else(|| String::from("")),
            loan_status: LoanStatus::from(parse_string_attribute("loan_status", map).unwrap_or_else(|| LoanStatus::Open.to_string())),
            loan_date: parse_day_attribute("loan_date", map).unwrap_or_else(|| Utc::now().date_naive()),
            due_date: parse_day_attribute("due_date", map).unwrap_or_else(|| Utc::now().date_naive()),
            return_date: parse_day_attribute("return_date", map),
            closed: parse_bool_attribute("closed", map),
            late_fee: parse_float_attribute("late_fee", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
