use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::FieldValue;

/// 解析后端返回的日期字符串，支持 RFC3339、"yyyy-mm-dd hh:mm:ss" 和 "yyyy-mm-dd"
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// 日期比较键（毫秒时间戳）
///
/// 无法解析的值视为负无穷，排在最旧的位置，不会中断整个列表。
pub fn date_millis(value: Option<&FieldValue<'_>>) -> f64 {
    match value {
        Some(FieldValue::Date(d)) => d.timestamp_millis() as f64,
        Some(FieldValue::Text(s)) => parse_date(s)
            .map(|d| d.timestamp_millis() as f64)
            .unwrap_or(f64::NEG_INFINITY),
        Some(FieldValue::Number(n)) if n.is_finite() => *n,
        _ => f64::NEG_INFINITY,
    }
}

/// 解析 "startDate,endDate" 格式的日期范围
///
/// 开始日期取当天 00:00:00.000，结束日期取当天 23:59:59.999，任一侧可以为空，
/// 无法解析的一侧按未设置处理。
pub fn parse_date_range(raw: &str) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let mut parts = raw.splitn(2, ',');
    let start_str = parts.next().unwrap_or("").trim();
    let end_str = parts.next().unwrap_or("").trim();

    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
        .map(|dt| dt.and_utc());

    (start, end)
}
