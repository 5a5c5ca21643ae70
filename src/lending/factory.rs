use crate::catalog::factory::create_catalog_service;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::lending::domain::LendingService;
use crate::lending::domain::service::LendingServiceImpl;
use crate::lending::repository::LoanRepository;
use crate::lending::repository::ddb_loan_repository::{DDBLoanRepository, BORROWER_NDX, ITEM_NDX, STATE_NDX};
use crate::lending::repository::mem_loan_repository::MemLoanRepository;
use crate::members::factory::create_member_service;
use crate::utils::ddb::{build_db_client, create_table};
use crate::utils::mem::shared_db;

pub(crate) async fn create_loan_repository(store: RepositoryStore) -> Box<dyn LoanRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBLoanRepository::new(client, "loans", "items", "borrowers"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "loans", "loan_id",
                                 &[(ITEM_NDX, "item_id", "loan_date"),
                                     (BORROWER_NDX, "borrower_id", "loan_date"),
                                     (STATE_NDX, "loan_state", "due_date")]).await;
            Box::new(DDBLoanRepository::new(client, "loans", "items", "borrowers"))
        }
        RepositoryStore::InMemory => {
            Box::new(MemLoanRepository::new(shared_db()))
        }
    }
}

pub(crate) async fn create_lending_service(config: &Configuration, store: RepositoryStore) -> Box<dyn LendingService> {
    let loan_repo = create_loan_repository(store).await;
    let catalog_svc = create_catalog_service(config, store).await;
    let member_svc = create_member_service(config, store).await;
    let publisher = create_publisher(store.gateway_publisher()).await;
    Box::new(LendingServiceImpl::new(config, loan_repo, catalog_svc, member_svc, publisher))
}
