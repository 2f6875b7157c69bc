//! 时间工具函数: 业务时区转换
//!
//! 数据库只存 `i64` Unix millis；订单所属的营业日期由创建时间在
//! 业务时区下的日历日期决定，统一格式为 `YYYY-MM-DD`。

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;

use super::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Unix millis → 业务时区下的日历日期
pub fn business_date(millis: i64, tz: Tz) -> NaiveDate {
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| {
            chrono::DateTime::from_timestamp_millis(millis)
                .unwrap_or_default()
                .date_naive()
        })
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let Some(naive) = date.and_hms_opt(hour, min, sec) else {
        return date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis();
    };
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 小票上显示的本地时间 (YYYY-MM-DD HH:MM, 业务时区)
pub fn format_ticket_time(millis: i64, tz: Tz) -> String {
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn business_date_follows_timezone() {
        // 2024-03-01 20:00 UTC is already 2024-03-02 01:30 in Kolkata
        let millis = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(
            format_date(business_date(millis, chrono_tz::Asia::Kolkata)),
            "2024-03-02"
        );
        assert_eq!(format_date(business_date(millis, chrono_tz::UTC)), "2024-03-01");
    }

    #[test]
    fn hms_round_trips_through_business_date() {
        let tz = chrono_tz::Asia::Kolkata;
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let late = date_hms_to_millis(date, 23, 59, 0, tz);
        assert_eq!(business_date(late, tz), date);
        assert_eq!(format_ticket_time(late, tz), "2024-12-31 23:59");
    }
}
