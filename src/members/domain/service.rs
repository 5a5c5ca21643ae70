use async_trait::async_trait;
use crate::borrowers::domain::model::BorrowerEntity;
use crate::borrowers::repository::BorrowerRepository;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::lending::repository::LoanRepository;
use crate::members::domain::MemberService;
use crate::members::dto::BorrowerDto;

pub(crate) struct MemberServiceImpl {
    borrower_repository: Box<dyn BorrowerRepository>,
    loan_repository: Box<dyn LoanRepository>,
}

impl MemberServiceImpl {
    pub(crate) fn new(_config: &Configuration, borrower_repository: Box<dyn BorrowerRepository>,
                      loan_repository: Box<dyn LoanRepository>) -> Self {
        MemberServiceImpl {
            borrower_repository,
            loan_repository,
        }
    }
}

#[async_trait]
impl MemberService for MemberServiceImpl {
    async fn add_borrower(&self, borrower: &BorrowerDto) -> LibraryResult<BorrowerDto> {
        let existing = self.borrower_repository.find_by_email(borrower.email.as_str()).await?;
        if !existing.is_empty() {
            return Err(LibraryError::duplicate_key(
                format!("borrower with email {} already exists", borrower.email).as_str()));
        }
        self.borrower_repository.create(&BorrowerEntity::from(borrower)).await?;
        Ok(borrower.clone())
    }

    // A member who still holds an open loan keeps their record until the
    // loan closes.
    async fn remove_borrower(&self, id: &str) -> LibraryResult<()> {
        let _ = self.borrower_repository.get(id).await?;
        let open = self.loan_repository.find_open_by_borrower(id).await?;
        if !open.is_empty() {
            return Err(LibraryError::invalid_operation(
                format!("cannot remove borrower {} with {} open loans", id, open.len()).as_str()));
        }
        self.borrower_repository.delete(id).await.map(|_| ())
    }

    async fn update_borrower(&self, borrower: &BorrowerDto) -> LibraryResult<BorrowerDto> {
        self.borrower_repository.update(&BorrowerEntity::from(borrower)).await?;
        Ok(borrower.clone())
    }

    async fn find_borrower_by_id(&self, id: &str) -> LibraryResult<BorrowerDto> {
        self.borrower_repository.get(id).await.map(|b| BorrowerDto::from(&b))
    }

    async fn find_borrower_by_email(&self, email: &str) -> LibraryResult<Vec<BorrowerDto>> {
        let records = self.borrower_repository.find_by_email(email).await?;
        Ok(records.iter().map(BorrowerDto::from).collect())
    }
}

impl From<&BorrowerEntity> for BorrowerDto {
    fn from(other: &BorrowerEntity) -> Self {
        Self {
            borrower_id: other.borrower_id.to_string(),
            version: other.version,
            first_name: other.first_name.to_string(),
            last_name: other.last_name.to_string(),
            email: other.email.to_string(),
            phone: other.phone.clone(),
            membership_status: other.membership_status,
            member_since: other.member_since,
            total_loans: other.total_loans,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&BorrowerDto> for BorrowerEntity {
    fn from(other: &BorrowerDto) -> Self {
        Self {
            borrower_id: other.borrower_id.to_string(),
            version: other.version,
            first_name: other.first_name.to_string(),
            last_name: other.last_name.to_string(),
            email: other.email.to_string(),
            phone: other.phone.clone(),
            membership_status: other.membership_status,
            member_since: other.member_since,
            total_loans: other.total_loans,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::core::domain::Configuration;
    use crate::core::library::{LibraryError, MembershipStatus};
    use crate::core::repository::RepositoryStore;
    use crate::members::domain::MemberService;
    use crate::members::dto::BorrowerDto;
    use crate::members::factory;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn MemberService>> = AsyncOnce::new(async {
                factory::create_member_service(&Configuration::new("test"), RepositoryStore::InMemory).await
            });
    }

    fn unique_email() -> String {
        format!("{}@org.cc", Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_should_add_and_find_borrower() {
        let member_svc = SUT_SVC.get().await;
        let borrower = BorrowerDto::new(unique_email().as_str());
        let _ = member_svc.add_borrower(&borrower).await.expect("should add borrower");
        let loaded = member_svc.find_borrower_by_id(borrower.borrower_id.as_str()).await.expect("should find borrower");
        assert_eq!(borrower.email, loaded.email);
        let by_email = member_svc.find_borrower_by_email(borrower.email.as_str()).await.expect("should query");
        assert_eq!(1, by_email.len());
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_email() {
        let member_svc = SUT_SVC.get().await;
        let borrower = BorrowerDto::new(unique_email().as_str());
        let _ = member_svc.add_borrower(&borrower).await.expect("should add borrower");
        let twin = BorrowerDto::new(borrower.email.as_str());
        let res = member_svc.add_borrower(&twin).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { message: _ })));
    }

    #[tokio::test]
    async fn test_should_update_borrower() {
        let member_svc = SUT_SVC.get().await;
        let mut borrower = BorrowerDto::new(unique_email().as_str());
        let _ = member_svc.add_borrower(&borrower).await.expect("should add borrower");
        borrower.membership_status = MembershipStatus::Suspended;
        let _ = member_svc.update_borrower(&borrower).await.expect("should update borrower");
        let loaded = member_svc.find_borrower_by_id(borrower.borrower_id.as_str()).await.expect("should find borrower");
        assert_eq!(MembershipStatus::Suspended, loaded.membership_status);
    }

    #[tokio::test]
    async fn test_should_remove_borrower_without_open_loans() {
        let member_svc = SUT_SVC.get().await;
        let borrower = BorrowerDto::new(unique_email().as_str());
        let _ = member_svc.add_borrower(&borrower).await.expect("should add borrower");
        let _ = member_svc.remove_borrower(borrower.borrower_id.as_str()).await.expect("should remove borrower");
        assert!(member_svc.find_borrower_by_id(borrower.borrower_id.as_str()).await.is_err());
    }
}
