use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::error::{Result, ViewError};
use crate::models::FieldValue;
use crate::refresh::{RefreshGuard, RefreshTicket};
use crate::state::{ListRecord, ListViewState};

/// 后端返回的 JSON 对象记录
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    id: String,
    fields: Map<String, Value>,
}

impl JsonRecord {
    /// 从 JSON 值构造，id 取 `id_field`（字符串或数字），缺失时使用 `#位置`
    pub fn from_value(value: Value, id_field: &str, position: usize) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(ViewError::InvalidRecord { position });
        };

        let id = match fields.get(id_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                // 位置 id 会随刷新后的顺序变化，选中项可能落到其他记录上
                warn!(id_field, position, "记录缺少 id，使用位置作为 id");
                format!("#{}", position)
            }
        };

        Ok(Self { id, fields })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    // 支持 "user.name" 形式的嵌套字段
    fn lookup(&self, name: &str) -> Option<&Value> {
        let mut parts = name.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

impl ListRecord for JsonRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = self.lookup(name)?;
        Some(match value {
            Value::String(s) => FieldValue::Text(Cow::Borrowed(s.as_str())),
            Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Null => FieldValue::Null,
            other => FieldValue::Text(Cow::Owned(other.to_string())),
        })
    }
}

// 原样输出原始对象
impl Serialize for JsonRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// 解析集合 - 接受 JSON 数组，或 `{"data": [...]}` 形式的分页响应
pub fn parse_collection(json: &str, id_field: &str) -> Result<Vec<JsonRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(ViewError::InvalidCollection),
        },
        _ => return Err(ViewError::InvalidCollection),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| JsonRecord::from_value(item, id_field, position))
        .collect()
}

/// 按页面名称保存的列表状态
///
/// 刷新令牌单独保存，页面重新初始化或卸载后再注册都沿用原来的计数，
/// 之前发出的请求仍然视为过期。
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<String, ListViewState<JsonRecord>>,
    refresh: HashMap<String, RefreshGuard>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初始化（或重置）一个页面的列表状态
    pub fn init(&mut self, screen: &str, config_json: &str) -> Result<()> {
        let config: ViewConfig =
            serde_json::from_str(config_json).map_err(ViewError::InvalidConfig)?;
        debug!(screen, page_size = config.page_size, "初始化列表");
        self.insert(screen, config);
        Ok(())
    }

    /// 使用已构建好的配置初始化
    pub fn insert(&mut self, screen: &str, config: ViewConfig) {
        self.views.insert(screen.to_string(), ListViewState::new(config));
    }

    /// 页面卸载时释放
    pub fn remove(&mut self, screen: &str) -> bool {
        self.views.remove(screen).is_some()
    }

    pub fn state(&self, screen: &str) -> Result<&ListViewState<JsonRecord>> {
        self.views
            .get(screen)
            .ok_or_else(|| ViewError::UnknownView(screen.to_string()))
    }

    pub fn state_mut(&mut self, screen: &str) -> Result<&mut ListViewState<JsonRecord>> {
        self.views
            .get_mut(screen)
            .ok_or_else(|| ViewError::UnknownView(screen.to_string()))
    }

    /// 发起刷新，返回令牌
    pub fn begin_refresh(&mut self, screen: &str) -> Result<RefreshTicket> {
        self.state(screen)?;
        Ok(self.refresh.entry(screen.to_string()).or_default().begin())
    }

    /// 直接替换集合（本地乐观更新或不需要令牌的场景）
    pub fn set_collection(&mut self, screen: &str, items_json: &str) -> Result<()> {
        let state = self.state_mut(screen)?;
        let items = parse_collection(items_json, &state.config().id_field)?;
        state.set_collection(items);
        Ok(())
    }

    /// 应用刷新结果，令牌过期时丢弃并返回 false
    pub fn apply_refresh(
        &mut self,
        screen: &str,
        ticket: RefreshTicket,
        items_json: &str,
    ) -> Result<bool> {
        let current = self
            .refresh
            .get(screen)
            .is_some_and(|guard| guard.is_current(ticket));
        let state = self.state_mut(screen)?;

        if !current {
            warn!(screen, ticket = ticket.0, "丢弃过期的刷新结果");
            return Ok(false);
        }

        let items = parse_collection(items_json, &state.config().id_field)?;
        state.set_collection(items);
        Ok(true)
    }

    /// 当前视图的 JSON 表示
    pub fn view_json(&self, screen: &str) -> Result<String> {
        let state = self.state(screen)?;
        serde_json::to_string(&state.view()).map_err(|e| ViewError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONFIG: &str = r#"{
        "searchable_fields": ["name", "user.email"],
        "filters": [{"kind": "choice", "key": "status", "options": ["active", "withdrawn"]}],
        "page_size": 2
    }"#;

    const ITEMS: &str = r#"[
        {"id": 1, "name": "Bob", "status": "active", "user": {"email": "bob@example.com"}},
        {"id": 2, "name": "Alice", "status": "withdrawn", "user": {"email": "alice@example.com"}},
        {"id": "c-3", "name": "Carol", "status": "active", "user": {"email": "carol@corp.test"}}
    ]"#;

    #[test]
    fn test_record_ids_and_fields() {
        let record = JsonRecord::from_value(json!({"uuid": 7, "n": 1.5}), "uuid", 0).unwrap();
        assert_eq!(record.id(), "7");
        assert_eq!(record.field("n"), Some(FieldValue::Number(1.5)));
        assert_eq!(record.field("missing"), None);

        let anonymous = JsonRecord::from_value(json!({"name": "x"}), "id", 4).unwrap();
        assert_eq!(anonymous.id(), "#4");

        assert!(matches!(
            JsonRecord::from_value(json!([1, 2]), "id", 3),
            Err(ViewError::InvalidRecord { position: 3 })
        ));
    }

    #[test]
    fn test_parse_collection_envelope() {
        let items = parse_collection(r#"{"data": [{"id": "a"}], "pagination": {}}"#, "id").unwrap();
        assert_eq!(items.len(), 1);
        assert!(matches!(
            parse_collection(r#"{"rows": []}"#, "id"),
            Err(ViewError::InvalidCollection)
        ));
        assert!(matches!(
            parse_collection("not json", "id"),
            Err(ViewError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_registry_flow() {
        let mut registry = ViewRegistry::new();
        registry.init("consents", CONFIG).unwrap();
        registry.set_collection("consents", ITEMS).unwrap();

        let state = registry.state_mut("consents").unwrap();
        state.set_search_query("EXAMPLE.COM");
        state.set_filter("status", Some("active"));

        let view: Value = serde_json::from_str(&registry.view_json("consents").unwrap()).unwrap();
        assert_eq!(view["filtered_count"], 1);
        assert_eq!(view["rows"][0]["name"], "Bob");
        assert_eq!(view["rows"][0]["user"]["email"], "bob@example.com");
    }

    #[test]
    fn test_stale_refresh_is_dropped() {
        let mut registry = ViewRegistry::new();
        registry.init("consents", CONFIG).unwrap();

        let auto = registry.begin_refresh("consents").unwrap();
        let manual = registry.begin_refresh("consents").unwrap();

        assert!(registry.apply_refresh("consents", manual, ITEMS).unwrap());
        assert!(!registry.apply_refresh("consents", auto, "[]").unwrap());
        assert_eq!(registry.state("consents").unwrap().items().len(), 3);
    }

    #[test]
    fn test_reinit_keeps_refresh_tickets_increasing() {
        let mut registry = ViewRegistry::new();
        registry.init("consents", CONFIG).unwrap();
        let before_reset = registry.begin_refresh("consents").unwrap();

        registry.init("consents", CONFIG).unwrap();
        let after_reset = registry.begin_refresh("consents").unwrap();
        assert_ne!(before_reset, after_reset);

        assert!(registry.apply_refresh("consents", after_reset, ITEMS).unwrap());
        assert!(!registry
            .apply_refresh("consents", before_reset, r#"[{"id": "stale"}]"#)
            .unwrap());

        let state = registry.state("consents").unwrap();
        let ids: Vec<&str> = state.items().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "2", "c-3"]);
    }

    #[test]
    fn test_ticket_from_dropped_view_is_stale() {
        let mut registry = ViewRegistry::new();
        registry.init("users", CONFIG).unwrap();
        let unmounted = registry.begin_refresh("users").unwrap();
        assert!(registry.remove("users"));

        registry.init("users", CONFIG).unwrap();
        assert!(!registry.apply_refresh("users", unmounted, ITEMS).unwrap());
        assert!(registry.state("users").unwrap().items().is_empty());

        // 未领取过令牌的页面不接受任何结果
        registry.init("webhooks", CONFIG).unwrap();
        assert!(!registry
            .apply_refresh("webhooks", RefreshTicket(0), ITEMS)
            .unwrap());
    }

    #[test]
    fn test_unknown_screen_and_bad_config() {
        let mut registry = ViewRegistry::new();
        assert!(matches!(
            registry.view_json("users"),
            Err(ViewError::UnknownView(name)) if name == "users"
        ));
        assert!(matches!(
            registry.init("users", r#"{"page_size": "ten"}"#),
            Err(ViewError::InvalidConfig(_))
        ));

        registry.init("users", "{}").unwrap();
        assert!(registry.remove("users"));
        assert!(registry.state("users").is_err());
    }
}
