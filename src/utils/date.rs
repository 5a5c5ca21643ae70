pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub const DAY_FMT: &str = "%Y-%m-%d";

pub mod serializer {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::DATE_FMT;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time_to_json(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        let time = NaiveDateTime::parse_from_str(&str_time, DATE_FMT).map_err(D::Error::custom)?;
        Ok(time)
    }

    fn time_to_json(t: NaiveDateTime) -> String {
        DateTime::<Utc>::from_utc(t, Utc).to_rfc3339()
    }
}

// Loan dates are calendar days, not instants; they get a date-only format so
// due-date comparisons sort lexically in storage.
pub mod day_serializer {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::DAY_FMT;

    pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        format!("{}", day.format(DAY_FMT)).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let str_day: String = Deserialize::deserialize(deserializer)?;
        let day = NaiveDate::parse_from_str(&str_day, DAY_FMT).map_err(D::Error::custom)?;
        Ok(day)
    }
}

pub mod opt_day_serializer {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::DAY_FMT;

    pub fn serialize<S: Serializer>(day: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        day.map(|d| format!("{}", d.format(DAY_FMT))).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let str_day: Option<String> = Deserialize::deserialize(deserializer)?;
        match str_day {
            Some(s) if !s.is_empty() => {
                let day = NaiveDate::parse_from_str(&s, DAY_FMT).map_err(D::Error::custom)?;
                Ok(Some(day))
            }
            _ => Ok(None),
        }
    }
}
