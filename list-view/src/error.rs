use thiserror::Error;

/// JSON / JS 边界上的错误，列表状态本身不会出错
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("解析配置失败: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("解析数据失败: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("数据格式错误: 需要 JSON 数组或包含 data 数组的对象")]
    InvalidCollection,

    #[error("第 {position} 条记录不是 JSON 对象")]
    InvalidRecord { position: usize },

    #[error("列表未初始化: {0}")]
    UnknownView(String),

    #[error("获取列表锁失败")]
    LockPoisoned,

    #[error("序列化结果失败: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
