use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::BorrowerStatisticsDto;

pub(crate) struct BorrowerStatsCommand {
    lending_service: Box<dyn LendingService>,
}

impl BorrowerStatsCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BorrowerStatsCommandRequest {
    borrower_id: String,
}

impl BorrowerStatsCommandRequest {
    pub fn new(borrower_id: &str) -> Self {
        Self {
            borrower_id: borrower_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BorrowerStatsCommandResponse {
    pub(crate) statistics: BorrowerStatisticsDto,
}

impl BorrowerStatsCommandResponse {
    pub fn new(statistics: BorrowerStatisticsDto) -> Self {
        Self {
            statistics,
        }
    }
}

#[async_trait]
impl Command<BorrowerStatsCommandRequest, BorrowerStatsCommandResponse> for BorrowerStatsCommand {
    async fn execute(&self, req: BorrowerStatsCommandRequest) -> Result<BorrowerStatsCommandResponse, CommandError> {
        self.lending_service.borrower_statistics(req.borrower_id.as_str())
            .await.map_err(CommandError::from).map(BorrowerStatsCommandResponse::new)
    }
}
