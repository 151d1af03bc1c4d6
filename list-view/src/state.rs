use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::filter::{FilterCriteria, FilterValue};
use crate::models::{total_pages, FieldValue, ListView, Page, Patch, SortSpec};
use crate::sort::sort_indices;

/// 可在列表页展示的记录
pub trait ListRecord {
    /// 记录唯一标识，同一份集合内不重复
    fn id(&self) -> &str;

    /// 按字段名读取值，字段不存在时返回 None
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// 列表页状态 - 搜索、筛选、排序、分页和批量选择
///
/// 每次派生都按固定顺序执行：搜索 -> 筛选（AND）-> 稳定排序 -> 计算页数 -> 截取当前页。
/// 所有操作都是同步且不会失败的：越界页码会被夹紧，未知的筛选维度被忽略。
#[derive(Debug, Clone)]
pub struct ListViewState<T> {
    config: ViewConfig,
    items: Vec<T>,
    query: String,
    filters: FilterCriteria,
    sort: Option<SortSpec>,
    page: Page,
    selection: BTreeSet<String>,
}

impl<T: ListRecord> ListViewState<T> {
    /// 创建空列表
    pub fn new(config: ViewConfig) -> Self {
        Self::with_collection(config, Vec::new())
    }

    /// 使用初始集合创建
    pub fn with_collection(config: ViewConfig, items: Vec<T>) -> Self {
        let page = Page::new(config.page_size);
        let sort = config.default_sort.clone();
        let mut state = Self {
            config,
            items: Vec::new(),
            query: String::new(),
            filters: FilterCriteria::new(),
            sort,
            page,
            selection: BTreeSet::new(),
        };
        state.set_collection(items);
        state
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// 当前的完整集合
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// 替换整个集合（刷新或本地乐观更新之后）
    ///
    /// 保留搜索词、筛选、排序；重新夹紧页码；移除已经不存在的选中项。
    pub fn set_collection(&mut self, items: Vec<T>) {
        let mut ids: HashSet<&str> = HashSet::with_capacity(items.len());
        let mut duplicates = 0usize;
        for item in &items {
            if !ids.insert(item.id()) {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            warn!(duplicates, "集合中存在重复的记录 id");
        }

        let before = self.selection.len();
        self.selection.retain(|id| ids.contains(id.as_str()));
        let pruned = before - self.selection.len();
        drop(ids);

        self.items = items;
        self.clamp_page();

        debug!(
            total = self.items.len(),
            pruned,
            page = self.page.index,
            "集合已更新"
        );
    }

    /// 本地乐观更新：基于当前集合生成新快照，再走 `set_collection`
    pub fn apply_patch(&mut self, patch: Patch<T>) {
        let mut next = std::mem::take(&mut self.items);

        match patch {
            Patch::Insert(record) => match next.iter().position(|r| r.id() == record.id()) {
                Some(pos) => next[pos] = record,
                None => next.push(record),
            },
            Patch::Replace(record) => {
                if let Some(pos) = next.iter().position(|r| r.id() == record.id()) {
                    next[pos] = record;
                }
            }
            Patch::Remove(id) => next.retain(|r| r.id() != id),
        }

        self.set_collection(next);
    }

    /// 更新搜索词，页码回到第一页
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page.index = 1;
        debug!(query = %self.query, "搜索词已更新");
    }

    /// 更新单个筛选维度，页码回到第一页
    ///
    /// `None`、空串或 "all" 表示清除该维度；未在配置中声明的维度直接忽略。
    pub fn set_filter(&mut self, key: &str, value: Option<&str>) {
        let Some(dimension) = self.config.dimension(key) else {
            debug!(key, "忽略未声明的筛选维度");
            return;
        };

        let resolved = FilterValue::resolve(dimension, value);
        debug!(key, ?resolved, "筛选条件已更新");
        self.filters.set(key, resolved);
        self.page.index = 1;
    }

    /// 清除全部筛选和搜索词，排序保持不变
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.query.clear();
        self.page.index = 1;
    }

    /// 生效的筛选维度数量
    pub fn active_filter_count(&self) -> usize {
        self.filters.len()
    }

    /// 点击表头：同一字段切换方向，新字段从升序开始；不重置页码
    pub fn set_sort(&mut self, field: &str) {
        if field.is_empty() {
            return;
        }

        self.sort = match self.sort.take() {
            Some(current) if current.field == field => Some(SortSpec {
                direction: current.direction.toggled(),
                ..current
            }),
            _ => Some(SortSpec::ascending(field)),
        };
        debug!(sort = ?self.sort, "排序已更新");
    }

    /// 取消排序，恢复集合原有顺序
    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// 跳转页码，越界时夹紧到 [1, total_pages]
    pub fn set_page(&mut self, index: usize) {
        self.page.index = index;
        self.clamp_page();
    }

    /// 修改每页条数，页码回到第一页
    pub fn set_page_size(&mut self, size: usize) {
        self.page = Page::new(size);
    }

    /// 切换单条记录的选中状态，集合中不存在的 id 被忽略
    pub fn toggle_select(&mut self, id: &str) {
        if self.selection.remove(id) {
            return;
        }
        if self.items.iter().any(|r| r.id() == id) {
            self.selection.insert(id.to_string());
        }
    }

    /// 全选当前可见（搜索和筛选之后）的记录；已经全选时清空选择
    pub fn select_all_visible(&mut self) {
        let visible: Vec<usize> = self.filtered_indices();

        if self.all_selected(&visible) {
            self.selection.clear();
        } else {
            self.selection = visible
                .iter()
                .map(|&i| self.items[i].id().to_string())
                .collect();
        }
        debug!(selected = self.selection.len(), "全选状态已切换");
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// 已选中的记录，按集合顺序返回（批量操作使用）
    pub fn selected_records(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|r| self.selection.contains(r.id()))
            .collect()
    }

    /// 某个字段在整个集合中出现过的取值（用于填充筛选下拉框）
    pub fn facet_values(&self, key: &str) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|r| r.field(key))
            .filter_map(|value| value.to_text().map(|text| text.into_owned()))
            .filter(|text| !text.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 派生当前视图，不修改任何状态
    pub fn view(&self) -> ListView<'_, T> {
        let visible = self.visible_indices();
        let filtered_count = visible.len();
        let total_pages = total_pages(filtered_count, self.page.size);
        let page = self.page.clamped(total_pages);

        let start = (page.index - 1) * page.size;
        let end = (start + page.size).min(filtered_count);
        let rows = if start < filtered_count {
            visible[start..end].iter().map(|&i| &self.items[i]).collect()
        } else {
            Vec::new()
        };

        ListView {
            rows,
            total_count: self.items.len(),
            filtered_count,
            total_pages,
            page,
            has_next: page.index < total_pages,
            has_prev: page.index > 1,
            query: &self.query,
            sort: self.sort.as_ref(),
            selection: self.selection.iter().map(String::as_str).collect(),
            all_visible_selected: self.all_selected(&visible),
        }
    }

    // 搜索 + 筛选，保持集合顺序
    fn filtered_indices(&self) -> Vec<usize> {
        let query = self.query.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches_search(r, &query) && self.matches_filters(r))
            .map(|(i, _)| i)
            .collect()
    }

    // 搜索 + 筛选 + 排序
    fn visible_indices(&self) -> Vec<usize> {
        let mut indices = self.filtered_indices();
        if let Some(spec) = &self.sort {
            let as_date = self.config.is_date_field(&spec.field);
            sort_indices(&self.items, &mut indices, spec, as_date);
        }
        indices
    }

    fn matches_search(&self, record: &T, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }

        self.config.searchable_fields.iter().any(|field| {
            record
                .field(field)
                .and_then(|value| value.to_text().map(|text| text.to_lowercase()))
                .is_some_and(|text| text.contains(query))
        })
    }

    fn matches_filters(&self, record: &T) -> bool {
        self.filters
            .iter()
            .all(|(key, value)| value.matches(record.field(key).as_ref()))
    }

    fn all_selected(&self, visible: &[usize]) -> bool {
        !visible.is_empty()
            && visible
                .iter()
                .all(|&i| self.selection.contains(self.items[i].id()))
    }

    fn clamp_page(&mut self) {
        let filtered_count = self.filtered_indices().len();
        self.page = self.page.clamped(total_pages(filtered_count, self.page.size));
    }
}
