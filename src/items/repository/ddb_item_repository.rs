use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::library::{ItemStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::utils::ddb::{add_filter_expr, from_ddb, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub(crate) struct DDBItemRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBItemRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<ItemEntity> for DDBItemRepository {
    async fn create(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(item_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &ItemEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("item_id", AttributeValue::S(entity.item_id.clone()))
            .update_expression("SET version = :version, shelf_code = :shelf_code, catalog_code = :catalog_code, title = :title, category = :category, item_status = :item_status, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":shelf_code", AttributeValue::S(entity.shelf_code.to_string()))
            .expression_attribute_values(":catalog_code", AttributeValue::S(entity.catalog_code.to_string()))
            .expression_attribute_values(":title", AttributeValue::S(entity.title.to_string()))
            .expression_attribute_values(":category", AttributeValue::S(entity.category.to_string()))
            .expression_attribute_values(":item_status", AttributeValue::S(entity.item_status.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<ItemEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .key("item_id", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(map) = req.item() {
                Ok(ItemEntity::from(map))
            } else {
                Err(LibraryError::not_found(format!("item not found for {}", id).as_str()))
            }
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("item_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // Queries by catalog_code go through the GSI; anything else falls back to
    // a filtered scan. Note you cannot use certain reserved words per
    // https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<ItemEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, predicate);
        if let Some(catalog_code) = predicate.get("catalog_code") {
            let mut request = self.client
                .query()
                .table_name(table_name)
                .index_name(index_name)
                .limit(cmp::min(page_size, 500) as i32)
                .consistent_read(false)
                .set_exclusive_start_key(exclusive_start_key)
                .key_condition_expression("catalog_code = :catalog_code")
                .expression_attribute_values(":catalog_code", AttributeValue::S(catalog_code.to_string()));
            let mut filter_expr = String::new();
            for (k, v) in predicate {
                if k != "catalog_code" {
                    let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                    request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
                }
            }
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr);
            }
            request
                .send()
                .await.map_err(LibraryError::from).map(|req| {
                let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                    .map(ItemEntity::from).collect();
                from_ddb(page, page_size, req.last_evaluated_key(), records)
            })
        } else {
            let mut request = self.client
                .scan()
                .table_name(table_name)
                .limit(cmp::min(page_size, 500) as i32)
                .set_exclusive_start_key(exclusive_start_key);
            let mut filter_expr = String::new();
            for (k, v) in predicate {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr);
            }
            request
                .send()
                .await.map_err(LibraryError::from).map(|req| {
                let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                    .map(ItemEntity::from).collect();
                from_ddb(page, page_size, req.last_evaluated_key(), records)
            })
        }
    }
}

#[async_trait]
impl ItemRepository for DDBItemRepository {
    async fn find_by_catalog_code(&self, catalog_code: &str) -> LibraryResult<Vec<ItemEntity>> {
        let res = self.query(
            &HashMap::from([("catalog_code".to_string(), catalog_code.to_string())]), None, 100).await?;
        Ok(res.records)
    }
}

impl From<&HashMap<String, AttributeValue>> for ItemEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        ItemEntity {
            item_id: parse_string_attribute("item_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            shelf_code: parse_string_attribute("shelf_code", map).unwrap_or_else(|| String::from("")),
            catalog_code: parse_string_attribute("catalog_code", map).unwrap_or_else(|| String::from("")),
            title: parse_string_attribute("title", map).unwrap_or_else(|| String::from("")),
            category: parse_string_attribute("category", map).unwrap_or_else(|| String::from("general")),
            item_status: ItemStatus::from(parse_string_attribute("item_status", map).unwrap_or_else(|| ItemStatus::Unknown.to_string())),
            acquired_at: parse_date_attribute("acquired_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
