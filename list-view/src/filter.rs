use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::config::FilterDimension;
use crate::dates::{date_millis, parse_date_range};
use crate::models::FieldValue;

/// 下拉框里"全部"选项的取值
const ALL_SENTINEL: &str = "all";

/// 单个维度的筛选条件
///
/// 非法取值只能表示为 `Any`（不限），不会变成一个悄悄出错的比较。
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// 不限
    Any,
    /// 枚举取值，必须是维度声明过的选项
    Choice(String),
    /// 自由文本，忽略大小写相等
    Text(String),
    /// 日期范围，两端均为闭区间
    DateRange {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl FilterValue {
    /// 按维度声明解析用户输入
    pub fn resolve(dimension: &FilterDimension, raw: Option<&str>) -> Self {
        let raw = match raw.map(str::trim) {
            Some(s) if !s.is_empty() && !s.eq_ignore_ascii_case(ALL_SENTINEL) => s,
            _ => return FilterValue::Any,
        };

        match dimension {
            FilterDimension::Choice { options, .. } => options
                .iter()
                .find(|option| option.as_str() == raw)
                .map(|option| FilterValue::Choice(option.clone()))
                .unwrap_or(FilterValue::Any),
            FilterDimension::Text { .. } => FilterValue::Text(raw.to_string()),
            FilterDimension::DateRange { .. } => match parse_date_range(raw) {
                (None, None) => FilterValue::Any,
                (start, end) => FilterValue::DateRange { start, end },
            },
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, FilterValue::Any)
    }

    /// 判断字段值是否满足条件
    pub fn matches(&self, value: Option<&FieldValue<'_>>) -> bool {
        match self {
            FilterValue::Any => true,
            FilterValue::Choice(expected) => value
                .and_then(FieldValue::to_text)
                .is_some_and(|text| text == expected.as_str()),
            FilterValue::Text(expected) => value
                .and_then(FieldValue::to_text)
                .is_some_and(|text| text.to_lowercase() == expected.to_lowercase()),
            FilterValue::DateRange { start, end } => {
                let millis = date_millis(value);
                let after_start = start.map_or(true, |s| millis >= s.timestamp_millis() as f64);
                let before_end = end.map_or(true, |e| millis <= e.timestamp_millis() as f64);
                after_start && before_end
            }
        }
    }
}

/// 全部筛选条件，只保存生效的维度
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置某个维度，`Any` 等同于移除
    pub fn set(&mut self, key: &str, value: FilterValue) {
        if value.is_any() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_string(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 生效的维度数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn status_dimension() -> FilterDimension {
        FilterDimension::Choice {
            key: "status".to_string(),
            options: vec!["active".to_string(), "withdrawn".to_string()],
        }
    }

    #[test]
    fn test_resolve_choice() {
        let dim = status_dimension();
        assert_eq!(
            FilterValue::resolve(&dim, Some("active")),
            FilterValue::Choice("active".to_string())
        );
        // 未声明的取值不会生效
        assert_eq!(FilterValue::resolve(&dim, Some("bogus")), FilterValue::Any);
        assert_eq!(FilterValue::resolve(&dim, Some("")), FilterValue::Any);
        assert_eq!(FilterValue::resolve(&dim, Some("all")), FilterValue::Any);
        assert_eq!(FilterValue::resolve(&dim, None), FilterValue::Any);
    }

    #[test]
    fn test_text_filter_ignores_case() {
        let dim = FilterDimension::Text {
            key: "role".to_string(),
        };
        let value = FilterValue::resolve(&dim, Some("Admin"));
        assert!(value.matches(Some(&FieldValue::from("admin"))));
        assert!(!value.matches(Some(&FieldValue::from("guardian"))));
        assert!(!value.matches(None));
    }

    #[test]
    fn test_date_range_filter() {
        let dim = FilterDimension::DateRange {
            key: "created_at".to_string(),
        };
        let value = FilterValue::resolve(&dim, Some("2024-01-01,2024-01-31"));
        let inside = FieldValue::from(Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap());
        let outside = FieldValue::from("2024-02-01T00:00:00Z");
        assert!(value.matches(Some(&inside)));
        assert!(!value.matches(Some(&outside)));
        assert!(!value.matches(Some(&FieldValue::from("garbage"))));

        // 结束日期的最后一秒内带毫秒的时间戳
        assert!(value.matches(Some(&FieldValue::from("2024-01-31T23:59:59.900Z"))));
        assert!(value.matches(Some(&FieldValue::from("2024-01-31T23:59:59.999Z"))));
        assert!(value.matches(Some(&FieldValue::from("2024-01-01T00:00:00.000Z"))));
        assert!(!value.matches(Some(&FieldValue::from("2023-12-31T23:59:59.999Z"))));

        let open_start = FilterValue::resolve(&dim, Some(",2024-01-31"));
        assert!(open_start.matches(Some(&FieldValue::from("garbage"))));

        assert_eq!(FilterValue::resolve(&dim, Some("x,y")), FilterValue::Any);
    }

    #[test]
    fn test_criteria_any_removes_entry() {
        let mut criteria = FilterCriteria::new();
        criteria.set("status", FilterValue::Choice("active".to_string()));
        assert_eq!(criteria.len(), 1);
        criteria.set("status", FilterValue::Any);
        assert!(criteria.is_empty());
    }
}
