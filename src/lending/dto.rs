use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LoanStatus, MembershipStatus};
use crate::utils::date::{day_serializer, opt_day_serializer, serializer};

// LoanDto carries one lending episode across the service boundary.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct LoanDto {
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

impl Identifiable for LoanDto {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// Aggregate lending figures for one borrower, derived on read from the loan
// records; only total_loans is stored.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct BorrowerStatisticsDto {
    pub borrower_id: String,
    pub full_name: String,
    pub membership_status: MembershipStatus,
    #[serde(with = "day_serializer")]
    pub member_since: NaiveDate,
    pub total_loans: i64,
    pub currently_held: i64,
    pub currently_overdue: i64,
}

// One day of circulation-desk numbers.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct DailyLendingStatsDto {
    #[serde(with = "day_serializer")]
    pub stats_date: NaiveDate,
    pub opened: i64,
    pub closed: i64,
    pub currently_overdue: i64,
    pub active_loans: i64,
}
