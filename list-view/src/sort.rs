use std::cmp::Ordering;

use crate::dates::date_millis;
use crate::models::{FieldValue, SortDirection, SortSpec};
use crate::state::ListRecord;

/// 排序键 - 不同类型之间按 Absent < Number < Text < Bool 排列
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Absent,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl SortKey {
    /// 从字段值生成排序键，日期字段统一转为时间戳
    pub(crate) fn from_field(value: Option<FieldValue<'_>>, as_date: bool) -> Self {
        if as_date {
            return SortKey::Number(date_millis(value.as_ref()));
        }

        match value {
            None | Some(FieldValue::Null) => SortKey::Absent,
            Some(FieldValue::Text(s)) => SortKey::Text(s.to_lowercase()),
            Some(FieldValue::Number(n)) => SortKey::Number(n),
            Some(FieldValue::Date(d)) => SortKey::Number(d.timestamp_millis() as f64),
            Some(FieldValue::Bool(b)) => SortKey::Bool(b),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Absent => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Bool(_) => 3,
        }
    }

    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// 对记录下标做稳定排序，相同键保持原有顺序
pub(crate) fn sort_indices<T: ListRecord>(
    items: &[T],
    indices: &mut Vec<usize>,
    spec: &SortSpec,
    as_date: bool,
) {
    let mut keyed: Vec<(usize, SortKey)> = indices
        .iter()
        .map(|&i| (i, SortKey::from_field(items[i].field(&spec.field), as_date)))
        .collect();

    // sort_by 是稳定排序；降序时反转比较结果，相同键仍保持原有顺序
    match spec.direction {
        SortDirection::Ascending => keyed.sort_by(|a, b| a.1.compare(&b.1)),
        SortDirection::Descending => keyed.sort_by(|a, b| b.1.compare(&a.1)),
    }

    *indices = keyed.into_iter().map(|(i, _)| i).collect();
}
