use crate::borrowers::repository::BorrowerRepository;
use crate::borrowers::repository::ddb_borrower_repository::DDBBorrowerRepository;
use crate::borrowers::repository::mem_borrower_repository::MemBorrowerRepository;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};
use crate::utils::mem::shared_db;

pub(crate) async fn create_borrower_repository(store: RepositoryStore) -> Box<dyn BorrowerRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBBorrowerRepository::new(client, "borrowers", "borrowers_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "borrowers", "borrower_id",
                                 &[("borrowers_ndx", "email", "membership_status")]).await;
            Box::new(DDBBorrowerRepository::new(client, "borrowers", "borrowers_ndx"))
        }
        RepositoryStore::InMemory => {
            Box::new(MemBorrowerRepository::new(shared_db()))
        }
    }
}
