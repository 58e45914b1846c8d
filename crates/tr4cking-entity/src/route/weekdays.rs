//! Seven-day operating masks.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use tr4cking_core::AppError;

/// Days a schedule operates, Monday first, stored as `"1111100"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Weekdays(u8);

impl Weekdays {
    /// Every day of the week.
    pub const ALL: Weekdays = Weekdays(0b111_1111);

    /// Whether the mask includes `day`.
    pub fn includes(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// Whether the mask includes the weekday of `date`.
    pub fn includes_date(&self, date: NaiveDate) -> bool {
        self.includes(date.weekday())
    }
}

impl Default for Weekdays {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for Weekdays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in 0..7 {
            let c = if self.0 & (1 << bit) != 0 { '1' } else { '0' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for Weekdays {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 7 {
            return Err(AppError::validation(format!(
                "Weekday mask must have 7 characters, got '{s}'"
            )));
        }
        let mut mask = 0u8;
        for (bit, c) in s.chars().enumerate() {
            match c {
                '1' => mask |= 1 << bit,
                '0' => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Weekday mask may only contain '0' and '1', got '{s}'"
                    )));
                }
            }
        }
        if mask == 0 {
            return Err(AppError::validation(
                "Weekday mask must include at least one day",
            ));
        }
        Ok(Self(mask))
    }
}

impl Serialize for Weekdays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Weekdays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: AppError| serde::de::Error::custom(e.message))
    }
}

impl sqlx::Type<sqlx::Postgres> for Weekdays {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Weekdays {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Weekdays {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse::<Weekdays>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let mask: Weekdays = "1111100".parse().unwrap();
        assert_eq!(mask.to_string(), "1111100");
        assert!(mask.includes(Weekday::Mon));
        assert!(mask.includes(Weekday::Fri));
        assert!(!mask.includes(Weekday::Sat));
        assert!(!mask.includes(Weekday::Sun));
    }

    #[test]
    fn test_rejects_bad_masks() {
        assert!("0000000".parse::<Weekdays>().is_err());
        assert!("11111".parse::<Weekdays>().is_err());
        assert!("11111x1".parse::<Weekdays>().is_err());
    }

    #[test]
    fn test_includes_date() {
        let weekends: Weekdays = "0000011".parse().unwrap();
        // 2024-06-01 was a Saturday
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(weekends.includes_date(saturday));
        assert!(!weekends.includes_date(saturday.pred_opt().unwrap()));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Weekdays::ALL).unwrap();
        assert_eq!(json, "\"1111111\"");
        assert!(serde_json::from_str::<Weekdays>("\"0000000\"").is_err());
    }
}
