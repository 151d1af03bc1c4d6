use serde::{Deserialize, Serialize};

use crate::models::SortSpec;

/// 列表页配置 - 每个管理页面一份
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// JSON 记录的主键字段
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// 参与搜索的字段
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    /// 筛选维度
    #[serde(default)]
    pub filters: Vec<FilterDimension>,
    /// 以日期方式比较的字段（排序及日期范围筛选）
    #[serde(default)]
    pub date_fields: Vec<String>,
    /// 默认排序，为空时保持原始顺序
    #[serde(default)]
    pub default_sort: Option<SortSpec>,
    /// 每页条数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_page_size() -> usize {
    10
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            searchable_fields: Vec::new(),
            filters: Vec::new(),
            date_fields: Vec::new(),
            default_sort: None,
            page_size: default_page_size(),
        }
    }
}

impl ViewConfig {
    /// 按 key 查找筛选维度
    pub fn dimension(&self, key: &str) -> Option<&FilterDimension> {
        self.filters.iter().find(|d| d.key() == key)
    }

    pub fn is_date_field(&self, field: &str) -> bool {
        self.date_fields.iter().any(|f| f == field)
    }
}

/// 筛选维度 - 每个维度对应记录上的同名字段
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterDimension {
    /// 枚举型：只接受已知取值（状态、角色等下拉框）
    Choice { key: String, options: Vec<String> },
    /// 自由文本：忽略大小写的相等比较
    Text { key: String },
    /// 日期范围："startDate,endDate"
    DateRange { key: String },
}

impl FilterDimension {
    pub fn key(&self) -> &str {
        match self {
            FilterDimension::Choice { key, .. }
            | FilterDimension::Text { key }
            | FilterDimension::DateRange { key } => key,
        }
    }
}
