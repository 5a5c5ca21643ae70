use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::LoanDto;

pub(crate) struct ExtendLoanCommand {
    lending_service: Box<dyn LendingService>,
}

impl ExtendLoanCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtendLoanCommandRequest {
    loan_id: String,
    days: Option<i64>,
}

impl ExtendLoanCommandRequest {
    pub fn new(loan_id: &str, days: Option<i64>) -> Self {
        Self {
            loan_id: loan_id.to_string(),
            days,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtendLoanCommandResponse {
    pub(crate) loan: LoanDto,
}

impl ExtendLoanCommandResponse {
    pub fn new(loan: LoanDto) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<ExtendLoanCommandRequest, ExtendLoanCommandResponse> for ExtendLoanCommand {
    async fn execute(&self, req: ExtendLoanCommandRequest) -> Result<ExtendLoanCommandResponse, CommandError> {
        self.lending_service.extend_loan(req.loan_id.as_str(), req.days)
            .await.map_err(CommandError::from).map(ExtendLoanCommandResponse::new)
    }
}
