//! 时间工具函数 (业务时区转换)
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 与统计层只接收 `i64` Unix millis。

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Unix millis → 业务时区日期
pub fn business_date(ts: i64, tz: Tz) -> NaiveDate {
    tz.timestamp_millis_opt(ts)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| {
            chrono::DateTime::from_timestamp_millis(ts)
                .unwrap_or_default()
                .date_naive()
        })
}

/// 闭区间日期 → `[start, end)` millis
pub fn date_range_millis(from: NaiveDate, to: NaiveDate, tz: Tz) -> AppResult<(i64, i64)> {
    if from > to {
        return Err(AppError::validation(format!(
            "Start date {} is after end date {}",
            from, to
        )));
    }
    Ok((day_start_millis(from, tz), day_end_millis(to, tz)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let d = parse_date("2024-03-15").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_day_bounds_utc() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_start_millis(d, Tz::UTC), 1_704_067_200_000);
        assert_eq!(day_end_millis(d, Tz::UTC), 1_704_067_200_000 + 86_400_000);
    }

    #[test]
    fn test_business_date_respects_timezone() {
        // 2024-01-01 23:30 UTC is already Jan 2 in Madrid
        let ts = 1_704_067_200_000 + 23 * 3_600_000 + 30 * 60_000;
        assert_eq!(
            business_date(ts, Tz::UTC),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            business_date(ts, chrono_tz::Europe::Madrid),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(date_range_millis(a, b, Tz::UTC).is_err());
        let (start, end) = date_range_millis(b, a, Tz::UTC).unwrap();
        assert_eq!(end - start, 2 * 86_400_000);
    }
}
