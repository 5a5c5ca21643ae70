use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::LoanDto;

pub(crate) struct CloseLoanCommand {
    lending_service: Box<dyn LendingService>,
}

impl CloseLoanCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloseLoanCommandRequest {
    item_id: String,
    borrower_id: String,
}

impl CloseLoanCommandRequest {
    pub fn new(item_id: String, borrower_id: String) -> Self {
        Self {
            item_id,
            borrower_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CloseLoanCommandResponse {
    pub(crate) loan: LoanDto,
}

impl CloseLoanCommandResponse {
    pub fn new(loan: LoanDto) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<CloseLoanCommandRequest, CloseLoanCommandResponse> for CloseLoanCommand {
    async fn execute(&self, req: CloseLoanCommandRequest) -> Result<CloseLoanCommandResponse, CommandError> {
        self.lending_service.close_loan(req.item_id.as_str(), req.borrower_id.as_str())
            .await.map_err(CommandError::from).map(CloseLoanCommandResponse::new)
    }
}
