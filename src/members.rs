use crate::core::domain::Identifiable;
use crate::core::library::MembershipStatus;

pub mod command;
pub mod domain;
pub mod dto;
pub mod factory;
pub mod controller;

pub(crate) trait Borrower: Identifiable {
    fn membership(&self) -> MembershipStatus;
    fn is_active(&self) -> bool;
}
