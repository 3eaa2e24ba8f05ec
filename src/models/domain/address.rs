use bigdecimal::BigDecimal;

/// 链上地址及其余额水位。
/// 余额只在新水位（fetched_coin_balance_block_number）严格大于库中已存
/// 水位时才允许覆盖，防止回填与实时乱序写入互相践踏。
#[derive(Debug, Clone)]
pub struct AddressDomain {
    pub address_hash: String,
    /// None = 余额未知（本批次查询失败或尚未查询）
    pub fetched_coin_balance: Option<BigDecimal>,
    pub fetched_coin_balance_block_number: Option<i64>,
}

impl AddressDomain {
    pub fn unknown(address_hash: String) -> Self {
        Self {
            address_hash,
            fetched_coin_balance: None,
            fetched_coin_balance_block_number: None,
        }
    }
}
