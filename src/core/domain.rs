use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Configuration abstracts the lending policy knobs for the circulation system
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    pub branch_id: String,
    // loans run for two weeks unless extended
    pub loan_period_days: i64,
    pub extension_days: i64,
    // per-day charge on loans closed past their due date
    pub daily_late_fee: f64,
    // reminders fire for loans due within this many days
    pub reminder_ahead_days: i64,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            loan_period_days: 14,
            extension_days: 7,
            daily_late_fee: 0.50,
            reminder_ahead_days: 1,
        }
    }
}
