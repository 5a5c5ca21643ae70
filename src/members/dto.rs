use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::MembershipStatus;
use crate::members::Borrower;
use crate::utils::date::{day_serializer, serializer};

// BorrowerDto carries a member profile across the service boundary.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct BorrowerDto {
    pub borrower_id: String,
    pub version: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub membership_status: MembershipStatus,
    #[serde(with = "day_serializer")]
    pub member_since: NaiveDate,
    pub total_loans: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BorrowerDto {
    pub fn new(email: &str) -> Self {
        Self {
            borrower_id: Uuid::new_v4().to_string(),
            version: 0,
            first_name: "".to_string(),
            last_name: "".to_string(),
            email: email.to_string(),
            phone: None,
            membership_status: MembershipStatus::Active,
            member_since: Utc::now().date_naive(),
            total_loans: 0,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Identifiable for BorrowerDto {
    fn id(&self) -> String {
        self.borrower_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Borrower for BorrowerDto {
    fn membership(&self) -> MembershipStatus {
        self.membership_status
    }

    fn is_active(&self) -> bool {
        self.membership_status == MembershipStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::MembershipStatus;
    use crate::members::Borrower;
    use crate::members::dto::BorrowerDto;

    #[tokio::test]
    async fn test_should_build_borrower_dto() {
        let borrower = BorrowerDto::new("reader@org.cc");
        assert_eq!("reader@org.cc", borrower.email.as_str());
        assert!(borrower.is_active());
    }

    #[tokio::test]
    async fn test_should_not_be_active_when_suspended() {
        let mut borrower = BorrowerDto::new("reader@org.cc");
        borrower.membership_status = MembershipStatus::Suspended;
        assert!(!borrower.is_active());
        assert_eq!(MembershipStatus::Suspended, borrower.membership());
    }
}
