use crate::core::domain::Identifiable;
use crate::core::library::ItemStatus;

pub mod model;

pub(crate) trait Item: Identifiable {
    fn status(&self) -> ItemStatus;
    fn is_loanable(&self) -> bool;
}
