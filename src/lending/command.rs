pub mod borrower_stats_cmd;
pub mod close_loan_cmd;
pub mod extend_loan_cmd;
pub mod get_overdue_cmd;
pub mod open_loan_cmd;
pub mod sweep_overdue_cmd;
