use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::core::library::MembershipStatus;
use crate::members::domain::MemberService;
use crate::members::dto::BorrowerDto;

pub(crate) struct UpdateBorrowerCommand {
    member_service: Box<dyn MemberService>,
}

impl UpdateBorrowerCommand {
    pub(crate) fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBorrowerCommandRequest {
    borrower_id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    membership_status: Option<String>,
}

impl UpdateBorrowerCommandRequest {
    pub fn new(borrower_id: &str, first_name: Option<&str>, last_name: Option<&str>,
               phone: Option<&str>, membership_status: Option<&str>) -> Self {
        Self {
            borrower_id: borrower_id.to_string(),
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
            phone: phone.map(str::to_string),
            membership_status: membership_status.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBorrowerCommandResponse {
    pub(crate) borrower: BorrowerDto,
}

impl UpdateBorrowerCommandResponse {
    pub fn new(borrower: BorrowerDto) -> Self {
        Self {
            borrower,
        }
    }
}

#[async_trait]
impl Command<UpdateBorrowerCommandRequest, UpdateBorrowerCommandResponse> for UpdateBorrowerCommand {
    async fn execute(&self, req: UpdateBorrowerCommandRequest) -> Result<UpdateBorrowerCommandResponse, CommandError> {
        let mut borrower = self.member_service.find_borrower_by_id(req.borrower_id.as_str())
            .await.map_err(CommandError::from)?;
        if let Some(first_name) = &req.first_name {
            borrower.first_name = first_name.to_string();
        }
        if let Some(last_name) = &req.last_name {
            borrower.last_name = last_name.to_string();
        }
        if let Some(phone) = &req.phone {
            borrower.phone = Some(phone.to_string());
        }
        if let Some(membership_status) = &req.membership_status {
            borrower.membership_status = MembershipStatus::from(membership_status.to_string());
        }
        self.member_service.update_borrower(&borrower)
            .await.map_err(CommandError::from).map(UpdateBorrowerCommandResponse::new)
    }
}
