use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::LoanStatus;
use crate::utils::date::{day_serializer, opt_day_serializer, serializer};

// LoanEntity records one lending episode of an item to a borrower. Records
// are append-only history: closing sets return_date/closed once and the
// record is never deleted. loan_status is advisory; open-ness is carried by
// the closed flag and overdue-ness is derived from due_date.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct LoanEntity {
    pub loan_id: String,
    pub version: i64,
    pub branch_id: String,
    pub item_id: String,
    pub borrower_id: String,
    pub loan_status: LoanStatus,
    #[serde(with = "day_serializer")]
    pub loan_date: NaiveDate,
    #[serde(with = "day_serializer")]
    pub due_date: NaiveDate,
    #[serde(with = "opt_day_serializer")]
    pub return_date: Option<NaiveDate>,
    pub closed: bool,
    pub late_fee: f64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LoanEntity {
    pub fn new(branch_id: &str, item_id: &str, borrower_id: &str, loan_period_days: i64) -> Self {
        let today = Utc::now().date_naive();
        Self {
            loan_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            item_id: item_id.to_string(),
            borrower_id: borrower_id.to_string(),
            loan_status: LoanStatus::Open,
            loan_date: today,
            due_date: today + Duration::days(loan_period_days),
            return_date: None,
            closed: false,
            late_fee: 0.0,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for LoanEntity {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
