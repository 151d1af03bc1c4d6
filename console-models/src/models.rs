use chrono::{DateTime, Utc};
use list_view::{FieldValue, ListRecord};
use serde::{Deserialize, Serialize};

/// 审计日志
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuditLogEntry {
    pub id: String,
    /// 操作人
    pub actor: String,
    /// 操作类型，例如 consent.withdraw
    pub action: String,
    /// 被操作的资源
    pub resource: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    /// 后端原样返回的时间字符串，可能无法解析
    pub created_at: String,
}

impl ListRecord for AuditLogEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::from(&self.id),
            "actor" => FieldValue::from(&self.actor),
            "action" => FieldValue::from(&self.action),
            "resource" => FieldValue::from(&self.resource),
            "ip_address" => FieldValue::from(self.ip_address.as_deref()),
            "created_at" => FieldValue::from(&self.created_at),
            _ => return None,
        })
    }
}

/// 同意状态
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    Active,
    Withdrawn,
    Expired,
}

impl ConsentStatus {
    pub const ALL: [ConsentStatus; 3] = [Self::Active, Self::Withdrawn, Self::Expired];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Withdrawn => "withdrawn",
            Self::Expired => "expired",
        }
    }
}

/// 同意记录
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ConsentRecord {
    pub id: String,
    pub user_name: String,
    pub email: String,
    /// 处理目的
    pub purpose: String,
    pub status: ConsentStatus,
    pub granted_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl ListRecord for ConsentRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::from(&self.id),
            "user_name" => FieldValue::from(&self.user_name),
            "email" => FieldValue::from(&self.email),
            "purpose" => FieldValue::from(&self.purpose),
            "status" => FieldValue::from(self.status.as_str()),
            "granted_at" => FieldValue::from(self.granted_at),
            "expires_at" => FieldValue::from(self.expires_at.as_deref()),
            _ => return None,
        })
    }
}

/// DSAR 请求类型
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DsarType {
    Access,
    Deletion,
    Rectification,
    Portability,
}

impl DsarType {
    pub const ALL: [DsarType; 4] = [
        Self::Access,
        Self::Deletion,
        Self::Rectification,
        Self::Portability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Deletion => "deletion",
            Self::Rectification => "rectification",
            Self::Portability => "portability",
        }
    }
}

/// DSAR 处理状态
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DsarStatus {
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl DsarStatus {
    pub const ALL: [DsarStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

/// 数据主体访问请求
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DsarRequest {
    pub id: String,
    pub requester_name: String,
    pub requester_email: String,
    pub request_type: DsarType,
    pub status: DsarStatus,
    pub submitted_at: DateTime<Utc>,
    /// 截止日期由后端计算
    #[serde(default)]
    pub due_date: Option<String>,
}

impl ListRecord for DsarRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::from(&self.id),
            "requester_name" => FieldValue::from(&self.requester_name),
            "requester_email" => FieldValue::from(&self.requester_email),
            "request_type" => FieldValue::from(self.request_type.as_str()),
            "status" => FieldValue::from(self.status.as_str()),
            "submitted_at" => FieldValue::from(self.submitted_at),
            "due_date" => FieldValue::from(self.due_date.as_deref()),
            _ => return None,
        })
    }
}

/// 用户角色
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Dpo,
    Guardian,
    Viewer,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [Self::Admin, Self::Dpo, Self::Guardian, Self::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Dpo => "dpo",
            Self::Guardian => "guardian",
            Self::Viewer => "viewer",
        }
    }
}

/// 后台用户（含监护人）
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub active: bool,
    /// 监护人所监护的用户 id
    #[serde(default)]
    pub guardian_of: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl ListRecord for AdminUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::from(&self.id),
            "name" => FieldValue::from(&self.name),
            "email" => FieldValue::from(&self.email),
            "role" => FieldValue::from(self.role.as_str()),
            "active" => FieldValue::from(self.active),
            "guardian_of" => FieldValue::from(self.guardian_of.as_deref()),
            "last_login" => FieldValue::from(self.last_login),
            _ => return None,
        })
    }
}

/// Webhook 订阅
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    /// 连续投递失败次数
    #[serde(default)]
    pub failure_count: u32,
    #[serde(default)]
    pub last_triggered_at: Option<String>,
}

impl ListRecord for Webhook {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::from(&self.id),
            "url" => FieldValue::from(&self.url),
            "events" => FieldValue::from(self.events.join(", ")),
            "active" => FieldValue::from(self.active),
            "failure_count" => FieldValue::from(self.failure_count),
            "last_triggered_at" => FieldValue::from(self.last_triggered_at.as_deref()),
            _ => return None,
        })
    }
}

/// 增值服务目录项
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VasService {
    pub id: String,
    pub name: String,
    pub category: String,
    pub provider: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub price: f64,
}

impl ListRecord for VasService {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::from(&self.id),
            "name" => FieldValue::from(&self.name),
            "category" => FieldValue::from(&self.category),
            "provider" => FieldValue::from(&self.provider),
            "enabled" => FieldValue::from(self.enabled),
            "price" => FieldValue::from(self.price),
            _ => return None,
        })
    }
}
