//! BSON `DateTime` 산술
//!
//! 엔티티는 MongoDB의 `DateTime`(밀리초 정밀도)을 그대로 저장하므로
//! 만료/경과 계산도 밀리초 단위로 합니다.

use chrono::{SecondsFormat, Utc};
use mongodb::bson::DateTime;

use crate::core::errors::{AppError, AppResult};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_DAY: i64 = 24 * 60 * MILLIS_PER_MINUTE;

pub fn plus_seconds(at: DateTime, seconds: i64) -> DateTime {
    DateTime::from_millis(at.timestamp_millis() + seconds * MILLIS_PER_SECOND)
}

pub fn plus_minutes(at: DateTime, minutes: i64) -> DateTime {
    DateTime::from_millis(at.timestamp_millis() + minutes * MILLIS_PER_MINUTE)
}

pub fn plus_days(at: DateTime, days: i64) -> DateTime {
    DateTime::from_millis(at.timestamp_millis() + days * MILLIS_PER_DAY)
}

/// `from`부터 `to`까지 경과한 완전한 일 수 (음수 구간은 0)
pub fn elapsed_days(from: DateTime, to: DateTime) -> i64 {
    (to.timestamp_millis() - from.timestamp_millis()).max(0) / MILLIS_PER_DAY
}

pub fn from_unix_seconds(seconds: i64) -> DateTime {
    DateTime::from_millis(seconds * MILLIS_PER_SECOND)
}

/// 응답용 RFC 3339 (UTC, 밀리초)
pub fn to_rfc3339(at: DateTime) -> String {
    chrono::DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis())
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// 요청 필드의 RFC 3339 시각을 파싱합니다.
pub fn parse_rfc3339(value: &str, field: &str) -> AppResult<DateTime> {
    chrono::DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| DateTime::from_millis(dt.timestamp_millis()))
        .map_err(|_| AppError::invalid_field(field, "RFC 3339 형식의 시각이어야 합니다"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_and_elapsed() {
        let start = DateTime::from_millis(0);
        assert_eq!(plus_minutes(start, 15).timestamp_millis(), 15 * 60 * 1000);
        assert_eq!(elapsed_days(start, plus_days(start, 30)), 30);
        assert_eq!(elapsed_days(start, plus_minutes(plus_days(start, 29), 23 * 60 + 59)), 29);
        assert_eq!(elapsed_days(plus_days(start, 1), start), 0);
    }

    #[test]
    fn test_from_unix_seconds() {
        assert_eq!(from_unix_seconds(90).timestamp_millis(), 90_000);
        assert_eq!(plus_seconds(DateTime::from_millis(0), 2).timestamp_millis(), 2_000);
    }

    #[test]
    fn test_rfc3339_conversion() {
        let parsed = parse_rfc3339("2026-03-01T12:00:00+09:00", "scheduled_at").unwrap();
        assert_eq!(to_rfc3339(parsed), "2026-03-01T03:00:00.000Z");
        assert!(parse_rfc3339("next friday", "scheduled_at").is_err());
    }
}
