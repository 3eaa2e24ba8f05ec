use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use ethers_providers::ProviderError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum AppError {
    // 捕获所有 SQL 执行、ORM 映射错误、NotFound 错误等。
    #[error("Database query error: {0}")]
    DatabaseQuery(#[from] DieselError),

    // 处理从连接池获取连接失败的情况（通常包含底层的 ConnectionError）。
    #[error("Database connection pool error: {0}")]
    ConnectionPool(#[from] PoolError),

    #[error("Join error: {0}")]
    JoinError(#[from] JoinError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// 数据库层错误（连接/查询/写入）
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    /// 类型转换错误（U256→i64、BigDecimal 转换等）
    #[error("类型转换错误: {0}")]
    Conversion(String),

    /// 业务逻辑冲突（重复插入、状态异常）
    #[error("业务冲突错误: {0}")]
    Conflict(String),

    /// 资源未找到
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 内部不可预期错误（兜底）
    #[error("内部错误: {0}")]
    Internal(String),

    #[error("无效的provider: {0}")]
    ProviderError(String),

    #[error("无效的区块号: {0}")]
    InvalidBlockNumber(String),

    #[error("无效的数字: {0}")]
    InvalidNumber(String),

    #[error("解析错误: {0}")]
    ParserError(String),

    #[error("无效的URL: {0}")]
    InvalidUrl(String),

    #[error("无效的地址: {0}")]
    InvalidAddress(String),

    #[error("无效的tx_hash: {0}")]
    InvalidTxHash(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Internal(err.to_string())
    }
}
