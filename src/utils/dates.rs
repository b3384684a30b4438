use crate::utils::error::{BulletinError, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// 未指定時間時，公報以當地早上 8 點為準
pub const DEFAULT_ISSUE_HOUR: u32 = 8;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%:z", "%Y-%m-%dT%H:%M%:z"];

/// Resolve a `--date` argument into the `activeAt` instant sent upstream.
///
/// Accepted forms:
/// - `today`: today at 08:00 local time
/// - `YYYY-MM-DD`: that day at 08:00 local time
/// - `YYYY-MM-DDTHH:MM[:SS][+HH:MM]`: as given; without an offset the time is local
pub fn parse_active_at(input: &str) -> Result<DateTime<FixedOffset>> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("today") {
        return issue_time(Local::now().date_naive(), input);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt);
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return localize(naive, input);
        }
    }

    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| {
        BulletinError::InvalidDateError {
            input: input.to_string(),
            reason: format!("expected today, YYYY-MM-DD or an ISO datetime ({})", e),
        }
    })?;
    issue_time(day, input)
}

/// The instant a bulletin for `day` is requested at.
pub fn issue_time(day: NaiveDate, input: &str) -> Result<DateTime<FixedOffset>> {
    let time = NaiveTime::from_hms_opt(DEFAULT_ISSUE_HOUR, 0, 0).ok_or_else(|| {
        BulletinError::InvalidDateError {
            input: input.to_string(),
            reason: "invalid issue hour".to_string(),
        }
    })?;
    localize(day.and_time(time), input)
}

fn localize(naive: NaiveDateTime, input: &str) -> Result<DateTime<FixedOffset>> {
    // 夏令時間切換時取較早的時刻
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| BulletinError::InvalidDateError {
            input: input.to_string(),
            reason: "time does not exist in the local time zone".to_string(),
        })
}

pub fn parse_day(field: &str, input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| {
        BulletinError::InvalidDateError {
            input: input.to_string(),
            reason: format!("{} must be YYYY-MM-DD ({})", field, e),
        }
    })
}

/// Footer timestamp, e.g. `05.01.2025, 08:00`.
pub fn footer_stamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%d.%m.%Y, %H:%M").to_string()
}
