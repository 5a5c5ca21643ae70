use chrono::NaiveDate;

// Overdue and fee math is kept as pure functions of explicit dates so the
// sweep and close paths stay idempotent: same inputs, same answer, no hidden
// clock capture.

pub(crate) fn is_overdue(due_date: NaiveDate, as_of: NaiveDate, closed: bool) -> bool {
    !closed && as_of > due_date
}

pub(crate) fn days_overdue(due_date: NaiveDate, as_of: NaiveDate) -> i64 {
    std::cmp::max(0, (as_of - due_date).num_days())
}

// The fee runs against the current due date, so an extension that moves the
// due date later shrinks liability for the window it covers.
pub(crate) fn late_fee(due_date: NaiveDate, as_of: NaiveDate, daily_rate: f64) -> f64 {
    days_overdue(due_date, as_of) as f64 * daily_rate
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::lending::domain::penalty::{days_overdue, is_overdue, late_fee};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_should_not_be_overdue_on_or_before_due_date() {
        let due = day(2023, 4, 25);
        assert!(!is_overdue(due, day(2023, 4, 24), false));
        assert!(!is_overdue(due, due, false));
        assert!(is_overdue(due, day(2023, 4, 26), false));
    }

    #[tokio::test]
    async fn test_should_never_be_overdue_once_closed() {
        let due = day(2023, 4, 25);
        assert!(!is_overdue(due, day(2023, 5, 25), true));
    }

    #[tokio::test]
    async fn test_should_compute_deterministic_fee() {
        let due = day(2023, 4, 25);
        let as_of = day(2023, 5, 1);
        let first = late_fee(due, as_of, 0.50);
        let second = late_fee(due, as_of, 0.50);
        assert_eq!(first, second);
        assert_eq!(3.0, first);
    }

    #[tokio::test]
    async fn test_should_charge_nothing_at_or_before_due_date() {
        let due = day(2023, 4, 25);
        assert_eq!(0.0, late_fee(due, due, 0.50));
        assert_eq!(0.0, late_fee(due, day(2023, 4, 1), 0.50));
        assert_eq!(0, days_overdue(due, day(2023, 4, 1)));
    }

    #[tokio::test]
    async fn test_should_grow_fee_with_each_day() {
        let due = day(2023, 4, 25);
        let mut last = 0.0;
        for offset in 1..30 {
            let fee = late_fee(due, due + chrono::Duration::days(offset), 0.50);
            assert!(fee > last);
            last = fee;
        }
    }
}
