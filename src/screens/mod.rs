//! Screens
//!
//! Concrete screens built on the resource client: the five todo list views,
//! the todo detail actions and category management.

mod categories;
mod list;
mod todo_detail;

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};

use crate::error::{ClientError, ClientResult};

pub use categories::*;
pub use list::*;
pub use todo_detail::*;

/// Local midnight `days` days after `now`'s calendar day
pub fn start_of_day_after<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> ClientResult<DateTime<Utc>> {
    let day = now
        .date_naive()
        .checked_add_days(Days::new(days))
        .ok_or_else(|| ClientError::InvalidInput(format!("{} days from now is out of range", days)))?;
    now.timezone()
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|midnight| midnight.with_timezone(&Utc))
        .ok_or_else(|| ClientError::InvalidInput(format!("{} has no local midnight", day)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_start_of_day_after_uses_local_day() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        // 02:30 UTC on the 28th is still the 27th at UTC-5
        let now = tz.with_ymd_and_hms(2021, 8, 27, 21, 30, 0).unwrap();

        let tomorrow = start_of_day_after(&now, 1).unwrap();

        assert_eq!(tomorrow.to_rfc3339(), "2021-08-28T05:00:00+00:00");
    }

    #[test]
    fn test_start_of_day_after_zero_is_today() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let now = tz.with_ymd_and_hms(2021, 8, 27, 23, 59, 59).unwrap();

        let today = start_of_day_after(&now, 0).unwrap();

        assert_eq!(today.to_rfc3339(), "2021-08-27T00:00:00+00:00");
    }
}
