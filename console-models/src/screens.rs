use list_view::{SortSpec, ViewConfig, ViewConfigBuilder};
use std::fmt;
use std::str::FromStr;

use crate::models::{ConsentStatus, DsarStatus, DsarType, UserRole};

/// 管理后台的列表页面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    AuditLogs,
    Consents,
    Dsar,
    Users,
    Webhooks,
    VasServices,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Self::AuditLogs,
        Self::Consents,
        Self::Dsar,
        Self::Users,
        Self::Webhooks,
        Self::VasServices,
    ];

    /// 页面名称（同时作为 ListViewJS 的注册名）
    pub fn key(self) -> &'static str {
        match self {
            Self::AuditLogs => "audit_logs",
            Self::Consents => "consents",
            Self::Dsar => "dsar",
            Self::Users => "users",
            Self::Webhooks => "webhooks",
            Self::VasServices => "vas_services",
        }
    }

    /// 页面预设配置
    pub fn config(self) -> ViewConfig {
        match self {
            Self::AuditLogs => ViewConfigBuilder::new()
                .search(["actor", "action", "resource", "ip_address"])
                .text("action")
                .date_range("created_at")
                .sort(SortSpec::descending("created_at"))
                .page_size(20)
                .build(),
            Self::Consents => ViewConfigBuilder::new()
                .search(["user_name", "email", "purpose"])
                .choice("status", ConsentStatus::ALL.map(ConsentStatus::as_str))
                .text("purpose")
                .date_range("granted_at")
                .date_field("expires_at")
                .page_size(10)
                .build(),
            Self::Dsar => ViewConfigBuilder::new()
                .search(["id", "requester_name", "requester_email"])
                .choice("status", DsarStatus::ALL.map(DsarStatus::as_str))
                .choice("request_type", DsarType::ALL.map(DsarType::as_str))
                .date_range("submitted_at")
                .date_field("due_date")
                .sort(SortSpec::ascending("due_date"))
                .page_size(10)
                .build(),
            Self::Users => ViewConfigBuilder::new()
                .search(["name", "email"])
                .choice("role", UserRole::ALL.map(UserRole::as_str))
                .choice("active", ["true", "false"])
                .date_field("last_login")
                .page_size(10)
                .build(),
            Self::Webhooks => ViewConfigBuilder::new()
                .search(["url", "events"])
                .choice("active", ["true", "false"])
                .date_field("last_triggered_at")
                .page_size(10)
                .build(),
            Self::VasServices => ViewConfigBuilder::new()
                .search(["name", "category", "provider"])
                .text("category")
                .choice("enabled", ["true", "false"])
                .sort(SortSpec::ascending("name"))
                .page_size(12)
                .build(),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.key() == s)
            .ok_or_else(|| format!("未知页面: {}", s))
    }
}
