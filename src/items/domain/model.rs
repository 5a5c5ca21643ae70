use chrono::{NaiveDateTime, Utc};
use rand::Rng;
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::ItemStatus;
use crate::utils::date::serializer;

// ItemEntity abstracts one physical copy in the shared inventory; several
// copies of the same work circulate under different identifiers.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct ItemEntity {
    pub item_id: String,
    pub version: i64,
    // shelf placement assigned at intake
    pub shelf_code: String,
    // external identifier from the catalog source (e.g. ISBN)
    pub catalog_code: String,
    pub title: String,
    pub category: String,
    pub item_status: ItemStatus,
    #[serde(with = "serializer")]
    pub acquired_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl ItemEntity {
    pub fn new(catalog_code: &str, title: &str, status: ItemStatus) -> Self {
        Self {
            item_id: Uuid::new_v4().to_string(),
            version: 0,
            shelf_code: format!("{}", rand::thread_rng().gen_range(0..1000)),
            catalog_code: catalog_code.to_string(),
            title: title.to_string(),
            category: "general".to_string(),
            item_status: status,
            acquired_at: Utc::now().naive_utc(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for ItemEntity {
    fn id(&self) -> String {
        self.item_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::ItemStatus;
    use crate::items::domain::model::ItemEntity;

    #[tokio::test]
    async fn test_should_build_item() {
        let item = ItemEntity::new("978-0134190440", "title", ItemStatus::Available);
        assert_eq!("978-0134190440", item.catalog_code.as_str());
        assert_eq!("title", item.title.as_str());
        assert_eq!(ItemStatus::Available, item.item_status);
        assert_eq!(0, item.version);
    }
}
