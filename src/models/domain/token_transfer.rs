use crate::models::domain::token::TokenType;
use bigdecimal::BigDecimal;

/// 一条代币转账记录，以 (tx_hash, log_index) 为唯一标识。
/// 载荷二选一：单笔 amount/token_id，或 ERC-1155 批量的平行数组。
#[derive(Debug, Clone)]
pub struct TokenTransferDomain {
    pub tx_hash: String,
    pub log_index: i64,
    pub from_address: String,
    pub to_address: String,
    pub token_contract_address: String,
    pub block_number: i64,
    pub token_type: TokenType,
    pub amount: Option<BigDecimal>,
    pub token_id: Option<BigDecimal>,
    pub amounts: Option<Vec<BigDecimal>>,
    pub token_ids: Option<Vec<BigDecimal>>,
}
