use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::members::domain::MemberService;
use crate::members::dto::BorrowerDto;

pub(crate) struct AddBorrowerCommand {
    member_service: Box<dyn MemberService>,
}

impl AddBorrowerCommand {
    pub(crate) fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddBorrowerCommandRequest {
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl AddBorrowerCommandRequest {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            first_name: None,
            last_name: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBorrowerCommandResponse {
    pub(crate) borrower: BorrowerDto,
}

impl AddBorrowerCommandResponse {
    pub fn new(borrower: BorrowerDto) -> Self {
        Self {
            borrower,
        }
    }
}

#[async_trait]
impl Command<AddBorrowerCommandRequest, AddBorrowerCommandResponse> for AddBorrowerCommand {
    async fn execute(&self, req: AddBorrowerCommandRequest) -> Result<AddBorrowerCommandResponse, CommandError> {
        let mut borrower = BorrowerDto::new(req.email.as_str());
        if let Some(first_name) = &req.first_name {
            borrower.first_name = first_name.to_string();
        }
        if let Some(last_name) = &req.last_name {
            borrower.last_name = last_name.to_string();
        }
        self.member_service.add_borrower(&borrower)
            .await.map_err(CommandError::from).map(AddBorrowerCommandResponse::new)
    }
}
