use crate::borrowers::factory::create_borrower_repository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::lending::factory::create_loan_repository;
use crate::members::domain::MemberService;
use crate::members::domain::service::MemberServiceImpl;

pub(crate) async fn create_member_service(config: &Configuration, store: RepositoryStore) -> Box<dyn MemberService> {
    let borrower_repo = create_borrower_repository(store).await;
    let loan_repo = create_loan_repository(store).await;
    Box::new(MemberServiceImpl::new(config, borrower_repo, loan_repo))
}
