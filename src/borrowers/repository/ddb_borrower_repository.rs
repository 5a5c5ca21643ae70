use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::borrowers::domain::model::BorrowerEntity;
use crate::borrowers::repository::BorrowerRepository;
use crate::core::library::{LibraryError, LibraryResult, MembershipStatus, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, from_ddb, parse_date_attribute, parse_day_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, string_day, to_ddb_page};

#[derive(Debug)]
pub(crate) struct DDBBorrowerRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBorrowerRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<BorrowerEntity> for DDBBorrowerRepository {
    async fn create(&self, entity: &BorrowerEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(borrower_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BorrowerEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("borrower_id", AttributeValue::S(entity.borrower_id.clone()))
            .update_expression("SET version = :version, first_name = :first_name, last_name = :last_name, email = :email, phone = :phone, membership_status = :membership_status, member_since = :member_since, total_loans = :total_loans, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":first_name", AttributeValue::S(entity.first_name.to_string()))
            .expression_attribute_values(":last_name", AttributeValue::S(entity.last_name.to_string()))
            .expression_attribute_values(":email", AttributeValue::S(entity.email.to_string()))
            .expression_attribute_values(":phone", AttributeValue::S(entity.phone.clone().unwrap_or_default()))
            .expression_attribute_values(":membership_status", AttributeValue::S(entity.membership_status.to_string()))
            .expression_attribute_values(":member_since", string_day(entity.member_since))
            .expression_attribute_values(":total_loans", AttributeValue::N(entity.total_loans.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowerEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .key("borrower_id", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(map) = req.item() {
                Ok(BorrowerEntity::from(map))
            } else {
                Err(LibraryError::not_found(format!("borrower not found for {}", id).as_str()))
            }
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("borrower_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowerEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, predicate);
        if let Some(email) = predicate.get("email") {
            let mut request = self.client
                .query()
                .table_name(table_name)
                .index_name(index_name)
                .limit(cmp::min(page_size, 500) as i32)
                .consistent_read(false)
                .set_exclusive_start_key(exclusive_start_key)
                .key_condition_expression("email = :email")
                .expression_attribute_values(":email", AttributeValue::S(email.to_string()));
            let mut filter_expr = String::new();
            for (k, v) in predicate {
                if k != "email" {
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
                    .map(BorrowerEntity::from).collect();
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
                    .map(BorrowerEntity::from).collect();
                from_ddb(page, page_size, req.last_evaluated_key(), records)
            })
        }
    }
}

#[async_trait]
impl BorrowerRepository for DDBBorrowerRepository {
    async fn find_by_email(&self, email: &str) -> LibraryResult<Vec<BorrowerEntity>> {
        let res = self.query(
            &HashMap::from([("email".to_string(), email.to_string())]), None, 100).await?;
        Ok(res.records)
    }
}

impl From<&HashMap<String, AttributeValue>> for BorrowerEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        let phone = parse_string_attribute("phone", map).filter(|p| !p.is_empty());
        BorrowerEntity {
            borrower_id: parse_string_attribute("borrower_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            first_name: parse_string_attribute("first_name", map).unwrap_or_else(|| String::from("")),
            last_name: parse_string_attribute("last_name", map).unwrap_or_else(|| String::from("")),
            email: parse_string_attribute("email", map).unwrap_or_else(|| String::from("")),
            phone,
            membership_status: MembershipStatus::from(parse_string_attribute("membership_status", map).unwrap_or_else(|| MembershipStatus::Pending.to_string())),
            member_since: parse_day_attribute("member_since", map).unwrap_or_else(|| Utc::now().date_naive()),
            total_loans: parse_number_attribute("total_loans", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
