use crate::config::{FilterDimension, ViewConfig};
use crate::models::SortSpec;

/// 列表页配置构建器
#[derive(Debug, Default)]
pub struct ViewConfigBuilder {
    config: ViewConfig,
}

impl ViewConfigBuilder {
    /// 创建新的配置构建器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.config.id_field = field.into();
        self
    }

    /// 添加搜索字段
    pub fn search<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .searchable_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// 添加枚举筛选维度
    pub fn choice<I, S>(mut self, key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filters.push(FilterDimension::Choice {
            key: key.into(),
            options: options.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// 添加文本筛选维度
    pub fn text(mut self, key: impl Into<String>) -> Self {
        self.config
            .filters
            .push(FilterDimension::Text { key: key.into() });
        self
    }

    /// 添加日期范围筛选维度，同时把该字段登记为日期字段
    pub fn date_range(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self = self.date_field(key.clone());
        self.config
            .filters
            .push(FilterDimension::DateRange { key });
        self
    }

    /// 登记日期字段
    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.config.date_fields.contains(&field) {
            self.config.date_fields.push(field);
        }
        self
    }

    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.config.default_sort = Some(spec);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size.max(1);
        self
    }

    /// 构建配置
    pub fn build(self) -> ViewConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ViewConfigBuilder::new()
            .search(["name", "email"])
            .choice("status", ["active", "withdrawn"])
            .text("purpose")
            .date_range("created_at")
            .date_field("created_at")
            .sort(SortSpec::descending("created_at"))
            .page_size(0)
            .build();

        assert_eq!(config.searchable_fields, vec!["name", "email"]);
        assert_eq!(config.filters.len(), 3);
        assert_eq!(config.date_fields, vec!["created_at"]);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.default_sort, Some(SortSpec::descending("created_at")));
    }
}
