use crate::core::repository::RepositoryStore;
use crate::items::repository::ItemRepository;
use crate::items::repository::ddb_item_repository::DDBItemRepository;
use crate::items::repository::mem_item_repository::MemItemRepository;
use crate::utils::ddb::{build_db_client, create_table};
use crate::utils::mem::shared_db;

pub(crate) async fn create_item_repository(store: RepositoryStore) -> Box<dyn ItemRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBItemRepository::new(client, "items", "items_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "items", "item_id",
                                 &[("items_ndx", "catalog_code", "item_status")]).await;
            Box::new(DDBItemRepository::new(client, "items", "items_ndx"))
        }
        RepositoryStore::InMemory => {
            Box::new(MemItemRepository::new(shared_db()))
        }
    }
}
