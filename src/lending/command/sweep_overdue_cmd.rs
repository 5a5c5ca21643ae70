use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;

pub(crate) struct SweepOverdueCommand {
    lending_service: Box<dyn LendingService>,
}

impl SweepOverdueCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SweepOverdueCommandRequest {
    as_of: Option<NaiveDate>,
}

impl SweepOverdueCommandRequest {
    pub fn new(as_of: Option<NaiveDate>) -> Self {
        Self {
            as_of,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SweepOverdueCommandResponse {
    #[serde(with = "crate::utils::date::day_serializer")]
    pub(crate) as_of: NaiveDate,
    pub(crate) transitioned: usize,
}

impl SweepOverdueCommandResponse {
    pub fn new(as_of: NaiveDate, transitioned: usize) -> Self {
        Self {
            as_of,
            transitioned,
        }
    }
}

#[async_trait]
impl Command<SweepOverdueCommandRequest, SweepOverdueCommandResponse> for SweepOverdueCommand {
    async fn execute(&self, req: SweepOverdueCommandRequest) -> Result<SweepOverdueCommandResponse, CommandError> {
        let as_of = req.as_of.unwrap_or_else(|| Utc::now().date_naive());
        let transitioned = self.lending_service.sweep_overdue(as_of)
            .await.map_err(CommandError::from)?;
        // the reminder pass observes the same records and never mutates;
        // its failure must not fail the sweep
        let _ = self.lending_service.send_due_reminders(as_of).await;
        Ok(SweepOverdueCommandResponse::new(as_of, transitioned))
    }
}
