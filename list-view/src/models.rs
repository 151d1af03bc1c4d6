use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// 记录字段值 - 搜索、筛选、排序共用的统一表示
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// 文本
    Text(Cow<'a, str>),
    /// 数值
    Number(f64),
    /// 已解析的时间
    Date(DateTime<Utc>),
    /// 布尔值
    Bool(bool),
    /// 空值
    Null,
}

impl<'a> FieldValue<'a> {
    /// 转换为文本形式，空值返回 None
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_ref())),
            FieldValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            FieldValue::Date(d) => Some(Cow::Owned(d.to_rfc3339())),
            FieldValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            FieldValue::Null => None,
        }
    }
}

// 整数不带小数点输出，与后端 JSON 的写法保持一致
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(value: String) -> Self {
        FieldValue::Text(Cow::Owned(value))
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl<'a, V: Into<FieldValue<'a>>> From<Option<V>> for FieldValue<'a> {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// 排序方向
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// 升序
    #[default]
    Ascending,
    /// 降序
    Descending,
}

impl SortDirection {
    /// 切换方向（点击表头时使用）
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// 排序规则 - 同一时间只有一个排序字段
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// 排序字段名
    pub field: String,
    /// 排序方向
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// 分页位置
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 当前页码（从1开始）
    pub index: usize,
    /// 每页条数（至少为1）
    pub size: usize,
}

impl Page {
    pub fn new(size: usize) -> Self {
        Self {
            index: 1,
            size: size.max(1),
        }
    }

    /// 把页码限制在 [1, total_pages] 之间
    pub fn clamped(self, total_pages: usize) -> Self {
        Self {
            index: self.index.clamp(1, total_pages.max(1)),
            size: self.size.max(1),
        }
    }
}

/// 总页数，结果为空时也至少有一页
pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    filtered_count.div_ceil(page_size.max(1)).max(1)
}

/// 本地乐观更新 - 增删改后生成新的集合快照
#[derive(Debug, Clone)]
pub enum Patch<T> {
    /// 新建记录（追加到末尾，id 已存在时替换）
    Insert(T),
    /// 按 id 替换记录
    Replace(T),
    /// 按 id 删除记录
    Remove(String),
}

/// 视图结果 - 渲染层每次状态变化后读取
#[derive(Serialize, Debug)]
pub struct ListView<'a, T> {
    /// 当前页的记录
    pub rows: Vec<&'a T>,
    /// 集合总数
    pub total_count: usize,
    /// 搜索和筛选后的总数
    pub filtered_count: usize,
    /// 总页数
    pub total_pages: usize,
    /// 当前分页
    pub page: Page,
    pub has_next: bool,
    pub has_prev: bool,
    /// 当前搜索词
    pub query: &'a str,
    /// 当前排序
    pub sort: Option<&'a SortSpec>,
    /// 已选中的记录 id
    pub selection: Vec<&'a str>,
    /// 可见记录是否已全部选中（表头复选框状态）
    pub all_visible_selected: bool,
}
