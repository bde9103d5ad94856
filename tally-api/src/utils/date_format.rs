//! Serde helpers for `YYYY-MM-DD` calendar dates.
//!
//! `time::Date` serializes as a tuple by default; the API speaks ISO dates.

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

use time::{format_description::well_known::Iso8601, Date, OffsetDateTime};

/// Parse either a bare `YYYY-MM-DD` date or a full ISO 8601 timestamp,
/// keeping only the calendar date.
pub fn parse_date(input: &str) -> Option<Date> {
    let trimmed = input.trim();
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(trimmed, &format)
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(trimmed, &Iso8601::DEFAULT)
                .ok()
                .map(|dt| dt.date())
        })
}

/// Deserialize request dates sent either as `YYYY-MM-DD` or as a timestamp.
pub mod lenient_date {
    use serde::{de::Error, Deserialize, Deserializer};
    use time::Date;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'")))
    }

    pub mod option {
        use serde::{de::Error, Deserialize, Deserializer};
        use time::Date;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => super::super::parse_date(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'"))),
                _ => Ok(None),
            }
        }
    }
}
