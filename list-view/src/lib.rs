use wasm_bindgen::prelude::*;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Mutex;
use web_sys::console;

// 导出模块
pub mod builder;
pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod json;
pub mod logging;
pub mod models;
pub mod refresh;
mod sort;
pub mod state;

pub use builder::ViewConfigBuilder;
pub use config::{FilterDimension, ViewConfig};
pub use error::ViewError;
pub use filter::{FilterCriteria, FilterValue};
pub use json::{JsonRecord, ViewRegistry};
pub use models::{FieldValue, ListView, Page, Patch, SortDirection, SortSpec};
pub use refresh::{RefreshGuard, RefreshTicket};
pub use state::{ListRecord, ListViewState};

// 全局列表状态，按页面名称区分
static VIEWS: OnceCell<Mutex<ViewRegistry>> = OnceCell::new();

/// 初始化函数 - 设置错误处理和控制台日志
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init_console_logging();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn with_registry<R>(f: impl FnOnce(&mut ViewRegistry) -> error::Result<R>) -> error::Result<R> {
    let registry = VIEWS.get_or_init(|| Mutex::new(ViewRegistry::new()));
    let mut guard = registry.lock().map_err(|_| ViewError::LockPoisoned)?;
    f(&mut guard)
}

// 修改某个页面的状态
fn update(screen: &str, f: impl FnOnce(&mut ListViewState<JsonRecord>)) -> Result<(), JsValue> {
    with_registry(|r| {
        f(r.state_mut(screen)?);
        Ok(())
    })
    .map_err(to_js_error)
}

fn to_js_error(e: ViewError) -> JsValue {
    let message = e.to_string();
    console::log_1(&JsValue::from_str(&format!("列表操作失败: {}", message)));
    JsValue::from_str(&message)
}

// JS 传入的页码可能为 0 或负数，统一按第一页处理
fn js_index(raw: i32) -> usize {
    usize::try_from(raw).unwrap_or(0).max(1)
}

// 转成普通 JS 对象，而不是 Map
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| to_js_error(ViewError::Serialize(e.to_string())))
}

/// 列表状态JS接口 - 每个管理页面用自己的名称注册一份状态
#[wasm_bindgen]
pub struct ListViewJS;

#[wasm_bindgen]
impl ListViewJS {
    /// 初始化页面状态，config_json 为 ViewConfig 的 JSON
    #[wasm_bindgen]
    pub fn init(screen: &str, config_json: &str) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        with_registry(|r| r.init(screen, config_json)).map_err(to_js_error)
    }

    /// 页面卸载
    #[wasm_bindgen]
    pub fn drop_view(screen: &str) -> Result<bool, JsValue> {
        with_registry(|r| Ok(r.remove(screen))).map_err(to_js_error)
    }

    /// 发起刷新前领取令牌
    #[wasm_bindgen]
    pub fn begin_refresh(screen: &str) -> Result<u32, JsValue> {
        with_registry(|r| r.begin_refresh(screen).map(|t| t.0)).map_err(to_js_error)
    }

    /// 应用刷新结果，令牌过期时返回 false 且不修改状态
    #[wasm_bindgen]
    pub fn apply_refresh(screen: &str, ticket: u32, items_json: &str) -> Result<bool, JsValue> {
        with_registry(|r| r.apply_refresh(screen, RefreshTicket(ticket), items_json))
            .map_err(to_js_error)
    }

    /// 直接替换集合（本地增删改之后）
    #[wasm_bindgen]
    pub fn set_collection(screen: &str, items_json: &str) -> Result<(), JsValue> {
        with_registry(|r| r.set_collection(screen, items_json)).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_search_query(screen: &str, query: &str) -> Result<(), JsValue> {
        update(screen, |s| s.set_search_query(query))
    }

    /// 设置筛选，value 为 undefined、空串或 "all" 时清除该维度
    #[wasm_bindgen]
    pub fn set_filter(screen: &str, key: &str, value: Option<String>) -> Result<(), JsValue> {
        update(screen, |s| s.set_filter(key, value.as_deref()))
    }

    #[wasm_bindgen]
    pub fn clear_filters(screen: &str) -> Result<(), JsValue> {
        update(screen, |s| s.clear_filters())
    }

    /// 点击表头
    #[wasm_bindgen]
    pub fn set_sort(screen: &str, field: &str) -> Result<(), JsValue> {
        update(screen, |s| s.set_sort(field))
    }

    /// 取消排序，恢复原始顺序
    #[wasm_bindgen]
    pub fn clear_sort(screen: &str) -> Result<(), JsValue> {
        update(screen, |s| s.clear_sort())
    }

    #[wasm_bindgen]
    pub fn set_page(screen: &str, index: i32) -> Result<(), JsValue> {
        update(screen, |s| s.set_page(js_index(index)))
    }

    #[wasm_bindgen]
    pub fn set_page_size(screen: &str, size: i32) -> Result<(), JsValue> {
        update(screen, |s| s.set_page_size(js_index(size)))
    }

    #[wasm_bindgen]
    pub fn toggle_select(screen: &str, id: &str) -> Result<(), JsValue> {
        update(screen, |s| s.toggle_select(id))
    }

    #[wasm_bindgen]
    pub fn select_all_visible(screen: &str) -> Result<(), JsValue> {
        update(screen, |s| s.select_all_visible())
    }

    #[wasm_bindgen]
    pub fn clear_selection(screen: &str) -> Result<(), JsValue> {
        update(screen, |s| s.clear_selection())
    }

    /// 获取当前视图
    #[wasm_bindgen]
    pub fn get_view(screen: &str) -> Result<JsValue, JsValue> {
        let registry = VIEWS.get_or_init(|| Mutex::new(ViewRegistry::new()));
        let guard = registry
            .lock()
            .map_err(|_| to_js_error(ViewError::LockPoisoned))?;
        let state = guard.state(screen).map_err(to_js_error)?;
        to_js(&state.view())
    }

    /// 已选中的 id（批量操作使用）
    #[wasm_bindgen]
    pub fn selected_ids(screen: &str) -> Result<js_sys::Array, JsValue> {
        with_registry(|r| {
            Ok(r.state(screen)?
                .selection()
                .iter()
                .map(|id| JsValue::from_str(id))
                .collect::<js_sys::Array>())
        })
        .map_err(to_js_error)
    }

    /// 某个字段在集合中的全部取值
    #[wasm_bindgen]
    pub fn facet_values(screen: &str, key: &str) -> Result<JsValue, JsValue> {
        let values = with_registry(|r| Ok(r.state(screen)?.facet_values(key))).map_err(to_js_error)?;
        to_js(&values)
    }
}
