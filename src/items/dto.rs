use chrono::{NaiveDateTime, Utc};
use rand::Rng;
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::ItemStatus;
use crate::items::domain::Item;
use crate::utils::date::serializer;

// ItemDto carries an inventory item across the service boundary.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct ItemDto {
    pub item_id: String,
    pub version: i64,
    pub shelf_code: String,
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

impl ItemDto {
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

impl Identifiable for ItemDto {
    fn id(&self) -> String {
        self.item_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Item for ItemDto {
    fn status(&self) -> ItemStatus {
        self.item_status
    }

    fn is_loanable(&self) -> bool {
        self.item_status == ItemStatus::Available
    }
}
