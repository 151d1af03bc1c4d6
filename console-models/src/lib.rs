pub mod models;
pub mod screens;

// 重新导出常用类型，方便直接使用
pub use models::{
    AdminUser, AuditLogEntry, ConsentRecord, ConsentStatus, DsarRequest, DsarStatus, DsarType,
    UserRole, VasService, Webhook,
};
pub use screens::Screen;
