use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // This is a retry-able error, which indicates that another writer committed
    // a conflicting change between our read and our conditional write. The
    // caller retries its precondition checks once against fresh state before
    // surfacing a precondition failure.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    // The item is not available for lending (on loan, lost, withdrawn, ...).
    ItemUnavailable {
        message: String,
    },
    // The borrower's membership does not permit new loans.
    NotEligible {
        message: String,
    },
    // The borrower holds at least one loan past its due date.
    OverdueLoans {
        message: String,
    },
    // The open loan for the item belongs to a different borrower.
    LoanMismatch {
        message: String,
    },
    // The requested loan-state transition is not allowed.
    InvalidOperation {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn item_unavailable(message: &str) -> LibraryError {
        LibraryError::ItemUnavailable { message: message.to_string() }
    }

    pub fn not_eligible(message: &str) -> LibraryError {
        LibraryError::NotEligible { message: message.to_string() }
    }

    pub fn overdue_loans(message: &str) -> LibraryError {
        LibraryError::OverdueLoans { message: message.to_string() }
    }

    pub fn loan_mismatch(message: &str) -> LibraryError {
        LibraryError::LoanMismatch { message: message.to_string() }
    }

    pub fn invalid_operation(message: &str) -> LibraryError {
        LibraryError::InvalidOperation { message: message.to_string() }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                LibraryError::validation(
                    format!("bad request error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::ItemUnavailable { .. } => { false }
            LibraryError::NotEligible { .. } => { false }
            LibraryError::OverdueLoans { .. } => { false }
            LibraryError::LoanMismatch { .. } => { false }
            LibraryError::InvalidOperation { .. } => { false }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::ItemUnavailable { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotEligible { message } => {
                write!(f, "{}", message)
            }
            LibraryError::OverdueLoans { message } => {
                write!(f, "{}", message)
            }
            LibraryError::LoanMismatch { message } => {
                write!(f, "{}", message)
            }
            LibraryError::InvalidOperation { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for circulation operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) enum ItemStatus {
    Available,
    OnLoan,
    Lost,
    Damaged,
    InRepair,
    Reserved,
    Withdrawn,
    Unknown,
}

impl From<String> for ItemStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Available" => ItemStatus::Available,
            "OnLoan" => ItemStatus::OnLoan,
            "Lost" => ItemStatus::Lost,
            "Damaged" => ItemStatus::Damaged,
            "InRepair" => ItemStatus::InRepair,
            "Reserved" => ItemStatus::Reserved,
            "Withdrawn" => ItemStatus::Withdrawn,
            _ => ItemStatus::Unknown,
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ItemStatus::Available => write!(f, "Available"),
            ItemStatus::OnLoan => write!(f, "OnLoan"),
            ItemStatus::Lost => write!(f, "Lost"),
            ItemStatus::Damaged => write!(f, "Damaged"),
            ItemStatus::InRepair => write!(f, "InRepair"),
            ItemStatus::Reserved => write!(f, "Reserved"),
            ItemStatus::Withdrawn => write!(f, "Withdrawn"),
            ItemStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) enum MembershipStatus {
    Active,
    Suspended,
    Expired,
    Cancelled,
    Pending,
}

impl From<String> for MembershipStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Active" => MembershipStatus::Active,
            "Suspended" => MembershipStatus::Suspended,
            "Expired" => MembershipStatus::Expired,
            "Cancelled" => MembershipStatus::Cancelled,
            _ => MembershipStatus::Pending,
        }
    }
}

impl Display for MembershipStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            MembershipStatus::Active => write!(f, "Active"),
            MembershipStatus::Suspended => write!(f, "Suspended"),
            MembershipStatus::Expired => write!(f, "Expired"),
            MembershipStatus::Cancelled => write!(f, "Cancelled"),
            MembershipStatus::Pending => write!(f, "Pending"),
        }
    }
}

// LoanStatus is advisory history; overdue-ness is always re-derived from the
// due date, never from this field.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) enum LoanStatus {
    Open,
    Returned,
    Overdue,
    Lost,
    Extended,
}

impl From<String> for LoanStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Open" => LoanStatus::Open,
            "Returned" => LoanStatus::Returned,
            "Overdue" => LoanStatus::Overdue,
            "Lost" => LoanStatus::Lost,
            "Extended" => LoanStatus::Extended,
            _ => LoanStatus::Open,
        }
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanStatus::Open => write!(f, "Open"),
            LoanStatus::Returned => write!(f, "Returned"),
            LoanStatus::Overdue => write!(f, "Overdue"),
            LoanStatus::Lost => write!(f, "Lost"),
            LoanStatus::Extended => write!(f, "Extended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{ItemStatus, LibraryError, LoanStatus, MembershipStatus};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_duplicate_key_error() {
        assert!(matches!(LibraryError::duplicate_key("test"), LibraryError::DuplicateKey{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_unavailable_error() {
        assert!(matches!(LibraryError::unavailable("test", None, false), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_lending_errors() {
        assert!(matches!(LibraryError::item_unavailable("test"), LibraryError::ItemUnavailable{ message: _ }));
        assert!(matches!(LibraryError::not_eligible("test"), LibraryError::NotEligible{ message: _ }));
        assert!(matches!(LibraryError::overdue_loans("test"), LibraryError::OverdueLoans{ message: _ }));
        assert!(matches!(LibraryError::loan_mismatch("test"), LibraryError::LoanMismatch{ message: _ }));
        assert!(matches!(LibraryError::invalid_operation("test"), LibraryError::InvalidOperation{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(LibraryError::validation("test", None), LibraryError::Validation{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_serialization_error() {
        assert!(matches!(LibraryError::serialization("test"), LibraryError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_runtime_error() {
        assert!(matches!(LibraryError::runtime("test", None), LibraryError::Runtime{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", None, true), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("400".to_string()), false), LibraryError::Validation{ message: _, reason_code: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::database("test", None, false).retryable());
        assert_eq!(false, LibraryError::duplicate_key("test").retryable());
        assert_eq!(false, LibraryError::not_found("test").retryable());
        assert_eq!(false, LibraryError::unavailable("test", None, false).retryable());
        assert_eq!(true, LibraryError::unavailable("test", None, true).retryable());
        assert_eq!(false, LibraryError::item_unavailable("test").retryable());
        assert_eq!(false, LibraryError::overdue_loans("test").retryable());
        assert_eq!(false, LibraryError::loan_mismatch("test").retryable());
        assert_eq!(false, LibraryError::invalid_operation("test").retryable());
        assert_eq!(false, LibraryError::validation("test", None).retryable());
        assert_eq!(false, LibraryError::serialization("test").retryable());
        assert_eq!(false, LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_format_item_status() {
        let statuses = vec![
            ItemStatus::Available,
            ItemStatus::OnLoan,
            ItemStatus::Lost,
            ItemStatus::Damaged,
            ItemStatus::InRepair,
            ItemStatus::Reserved,
            ItemStatus::Withdrawn,
            ItemStatus::Unknown,
        ];
        for status in statuses {
            let str = status.to_string();
            let str_status = ItemStatus::from(str);
            assert_eq!(status, str_status);
        }
    }

    #[tokio::test]
    async fn test_should_format_membership_status() {
        let statuses = vec![
            MembershipStatus::Active,
            MembershipStatus::Suspended,
            MembershipStatus::Expired,
            MembershipStatus::Cancelled,
            MembershipStatus::Pending,
        ];
        for status in statuses {
            let str = status.to_string();
            let str_status = MembershipStatus::from(str);
            assert_eq!(status, str_status);
        }
    }

    #[tokio::test]
    async fn test_should_format_loan_status() {
        let statuses = vec![
            LoanStatus::Open,
            LoanStatus::Returned,
            LoanStatus::Overdue,
            LoanStatus::Lost,
            LoanStatus::Extended,
        ];
        for status in statuses {
            let str = status.to_string();
            let str_status = LoanStatus::from(str);
            assert_eq!(status, str_status);
        }
    }
}
