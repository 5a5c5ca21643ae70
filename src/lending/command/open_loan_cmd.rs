use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::LoanDto;

pub(crate) struct OpenLoanCommand {
    lending_service: Box<dyn LendingService>,
}

impl OpenLoanCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenLoanCommandRequest {
    item_id: String,
    borrower_id: String,
}

impl OpenLoanCommandRequest {
    pub fn new(item_id: String, borrower_id: String) -> Self {
        Self {
            item_id,
            borrower_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenLoanCommandResponse {
    pub(crate) loan: LoanDto,
}

impl OpenLoanCommandResponse {
    pub fn new(loan: LoanDto) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<OpenLoanCommandRequest, OpenLoanCommandResponse> for OpenLoanCommand {
    async fn execute(&self, req: OpenLoanCommandRequest) -> Result<OpenLoanCommandResponse, CommandError> {
        self.lending_service.open_loan(req.item_id.as_str(), req.borrower_id.as_str())
            .await.map_err(CommandError::from).map(OpenLoanCommandResponse::new)
    }
}
