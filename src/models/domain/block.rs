use bigdecimal::BigDecimal;

/// 规范链上的一个区块。`consensus` 恒为 true：本索引器不处理分叉回滚。
#[derive(Debug, Clone)]
pub struct BlockDomain {
    pub block_number: i64,
    pub block_hash: String,
    pub parent_hash: String,
    pub miner_hash: String,
    pub difficulty: BigDecimal,
    pub total_difficulty: Option<BigDecimal>,
    pub gas_limit: BigDecimal,
    pub gas_used: BigDecimal,
    pub size: Option<i32>,
    pub nonce: String,
    /// unix 毫秒
    pub timestamp: i64,
    pub consensus: bool,
    /// true ⇔ 区块不含任何交易
    pub is_empty: bool,
}
