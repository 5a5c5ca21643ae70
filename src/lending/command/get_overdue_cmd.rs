use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::LoanDto;

pub(crate) struct GetOverdueCommand {
    lending_service: Box<dyn LendingService>,
}

impl GetOverdueCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetOverdueCommandRequest {
    as_of: Option<NaiveDate>,
    page: Option<String>,
    page_size: Option<usize>,
}

impl GetOverdueCommandRequest {
    pub fn new(as_of: Option<NaiveDate>, page: Option<&str>, page_size: Option<usize>) -> Self {
        Self {
            as_of,
            page: page.map(str::to_string),
            page_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetOverdueCommandResponse {
    pub(crate) loans: Vec<LoanDto>,
    pub(crate) next_page: Option<String>,
}

impl GetOverdueCommandResponse {
    pub fn new(loans: Vec<LoanDto>, next_page: Option<String>) -> Self {
        Self {
            loans,
            next_page,
        }
    }
}

#[async_trait]
impl Command<GetOverdueCommandRequest, GetOverdueCommandResponse> for GetOverdueCommand {
    async fn execute(&self, req: GetOverdueCommandRequest) -> Result<GetOverdueCommandResponse, CommandError> {
        let as_of = req.as_of.unwrap_or_else(|| Utc::now().date_naive());
        let res = self.lending_service.query_overdue(
            as_of, req.page.as_deref(), req.page_size.unwrap_or(50))
            .await.map_err(CommandError::from)?;
        Ok(GetOverdueCommandResponse::new(res.records, res.next_page))
    }
}
