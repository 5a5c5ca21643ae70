use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::members::domain::MemberService;
use crate::members::dto::BorrowerDto;

pub(crate) struct GetBorrowerCommand {
    member_service: Box<dyn MemberService>,
}

impl GetBorrowerCommand {
    pub(crate) fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetBorrowerCommandRequest {
    borrower_id: String,
}

impl GetBorrowerCommandRequest {
    pub fn new(borrower_id: &str) -> Self {
        Self {
            borrower_id: borrower_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetBorrowerCommandResponse {
    pub(crate) borrower: BorrowerDto,
}

impl GetBorrowerCommandResponse {
    pub fn new(borrower: BorrowerDto) -> Self {
        Self {
            borrower,
        }
    }
}

#[async_trait]
impl Command<GetBorrowerCommandRequest, GetBorrowerCommandResponse> for GetBorrowerCommand {
    async fn execute(&self, req: GetBorrowerCommandRequest) -> Result<GetBorrowerCommandResponse, CommandError> {
        self.member_service.find_borrower_by_id(req.borrower_id.as_str())
            .await.map_err(CommandError::from).map(GetBorrowerCommandResponse::new)
    }
}
