use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::MembershipStatus;
use crate::utils::date::{day_serializer, serializer};

// BorrowerEntity abstracts a registered member of the lending program.
// total_loans only ever grows; it is bumped once per successfully opened loan
// and never recomputed.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct BorrowerEntity {
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

impl BorrowerEntity {
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

impl Identifiable for BorrowerEntity {
    fn id(&self) -> String {
        self.borrower_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use crate::borrowers::domain::model::BorrowerEntity;
    use crate::core::library::MembershipStatus;

    #[tokio::test]
    async fn test_should_build_borrower() {
        let borrower = BorrowerEntity::new("reader@org.cc");
        assert_eq!("reader@org.cc", borrower.email.as_str());
        assert_eq!(MembershipStatus::Active, borrower.membership_status);
        assert_eq!(0, borrower.total_loans);
    }

    #[tokio::test]
    async fn test_should_format_full_name() {
        let mut borrower = BorrowerEntity::new("reader@org.cc");
        borrower.first_name = "Ada".to_string();
        borrower.last_name = "Lovelace".to_string();
        assert_eq!("Ada Lovelace", borrower.full_name());
    }
}
