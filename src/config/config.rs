use crate::errors::error::AppError;
use config::{ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub ethereum: EthereumConfig,
}

/// PostgreSQL 连接配置（结构化管理）
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub username: String,
    pub password: String,
    // 连接池优化参数
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EthereumConfig {
    /// RPC 节点地址列表，轮询使用
    pub rpc_urls: Vec<String>,
    pub max_retries: usize,
    pub base_delay_secs: u64,
    /// 回填时单个导入批次的最大区块数
    pub batch_size: u64,
    pub catchup_enabled: bool,
    pub realtime_enabled: bool,
    /// 实时跟踪的链头轮询间隔
    pub poll_interval_secs: u64,
    /// 实时队列容量（有界通道，满则产生背压）
    pub realtime_queue_size: usize,
    /// 回填根区间
    pub ranges: Vec<BlockRangeConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlockRangeConfig {
    pub first: BlockBound,
    pub last: BlockBound,
}

/// 区间边界：区块号字面量，或哨兵值 "latest"
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum BlockBound {
    Number(u64),
    Tag(String),
}

impl BlockBound {
    pub fn is_latest(&self) -> bool {
        matches!(self, BlockBound::Tag(tag) if tag == "latest")
    }

    /// 解析为具体区块号。"latest" 由调度器在启动时统一解析一次后传入。
    pub fn resolve(&self, latest: Option<u64>) -> Result<u64, AppError> {
        match self {
            BlockBound::Number(n) => Ok(*n),
            BlockBound::Tag(tag) if tag == "latest" => latest.ok_or_else(|| {
                AppError::InvalidBlockNumber("latest 未在调度器启动时解析".to_string())
            }),
            BlockBound::Tag(tag) => Err(AppError::InvalidBlockNumber(format!(
                "未知的区间边界: {}",
                tag
            ))),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_bound_resolves_without_head() {
        let bound = BlockBound::Number(123);
        assert_eq!(bound.resolve(None).unwrap(), 123);
    }

    #[test]
    fn latest_bound_takes_resolved_head() {
        let bound = BlockBound::Tag("latest".to_string());
        assert!(bound.is_latest());
        assert_eq!(bound.resolve(Some(19_000_000)).unwrap(), 19_000_000);
        assert!(bound.resolve(None).is_err());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let bound = BlockBound::Tag("pending".to_string());
        assert!(bound.resolve(Some(1)).is_err());
    }
}
