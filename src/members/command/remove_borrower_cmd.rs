use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::members::domain::MemberService;

pub(crate) struct RemoveBorrowerCommand {
    member_service: Box<dyn MemberService>,
}

impl RemoveBorrowerCommand {
    pub(crate) fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveBorrowerCommandRequest {
    borrower_id: String,
}

impl RemoveBorrowerCommandRequest {
    pub fn new(borrower_id: &str) -> Self {
        Self {
            borrower_id: borrower_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveBorrowerCommandResponse {
    pub(crate) borrower_id: String,
}

impl RemoveBorrowerCommandResponse {
    pub fn new(borrower_id: &str) -> Self {
        Self {
            borrower_id: borrower_id.to_string(),
        }
    }
}

#[async_trait]
impl Command<RemoveBorrowerCommandRequest, RemoveBorrowerCommandResponse> for RemoveBorrowerCommand {
    async fn execute(&self, req: RemoveBorrowerCommandRequest) -> Result<RemoveBorrowerCommandResponse, CommandError> {
        self.member_service.remove_borrower(req.borrower_id.as_str())
            .await.map_err(CommandError::from)
            .map(|_| RemoveBorrowerCommandResponse::new(req.borrower_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::core::command::Command;
    use crate::core::command::CommandError;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::members::command::add_borrower_cmd::{AddBorrowerCommand, AddBorrowerCommandRequest};
    use crate::members::command::remove_borrower_cmd::{RemoveBorrowerCommand, RemoveBorrowerCommandRequest};
    use crate::members::factory::create_member_service;

    lazy_static! {
        static ref ADD_CMD : AsyncOnce<AddBorrowerCommand> = AsyncOnce::new(async {
                let svc = create_member_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AddBorrowerCommand::new(svc)
            });
        static ref REMOVE_CMD : AsyncOnce<RemoveBorrowerCommand> = AsyncOnce::new(async {
                let svc = create_member_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                RemoveBorrowerCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_remove_borrower() {
        let add_cmd: &AddBorrowerCommand = ADD_CMD.get().await;
        let remove_cmd: &RemoveBorrowerCommand = REMOVE_CMD.get().await;
        let email = format!("{}@org.cc", Uuid::new_v4());
        let added = add_cmd.execute(AddBorrowerCommandRequest::new(email.as_str()))
            .await.expect("should add borrower");
        let res = remove_cmd.execute(RemoveBorrowerCommandRequest::new(added.borrower.borrower_id.as_str()))
            .await.expect("should remove borrower");
        assert_eq!(added.borrower.borrower_id, res.borrower_id);
    }

    #[tokio::test]
    async fn test_should_fail_remove_for_unknown_borrower() {
        let remove_cmd: &RemoveBorrowerCommand = REMOVE_CMD.get().await;
        let res = remove_cmd.execute(RemoveBorrowerCommandRequest::new("no-such-borrower")).await;
        assert!(matches!(res, Err(CommandError::NotFound { message: _ })));
    }
}
