use bigdecimal::BigDecimal;

pub const TX_STATUS_OK: i16 = 1;
pub const TX_STATUS_ERROR: i16 = 0;

/// 一笔已上链交易。
/// `status` / `cumulative_gas_used` 仅在抓取过回执时存在（回执按 input
/// selector 预筛后才拉取），None 表示"未取回执"，与执行失败不同。
#[derive(Debug, Clone)]
pub struct TransactionDomain {
    pub tx_hash: String,
    pub block_number: i64,
    pub from_address: String,
    /// None = 合约创建交易
    pub to_address: Option<String>,
    pub value: BigDecimal,
    pub gas: BigDecimal,
    pub gas_price: Option<BigDecimal>,
    pub cumulative_gas_used: Option<BigDecimal>,
    pub transaction_index: i32,
    pub nonce: i64,
    // 签名分量
    pub r: BigDecimal,
    pub s: BigDecimal,
    pub v: i64,
    pub status: Option<i16>,
    // EIP-1559
    pub max_fee_per_gas: Option<BigDecimal>,
    pub max_priority_fee_per_gas: Option<BigDecimal>,
    pub transaction_type: Option<i32>,
}
