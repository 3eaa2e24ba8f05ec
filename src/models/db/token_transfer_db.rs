use crate::models::db::schema::eth_token_transfer;
use crate::models::domain::token_transfer::TokenTransferDomain;
use bigdecimal::BigDecimal;
use diesel::Insertable;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = eth_token_transfer)]
pub struct TokenTransferInsert {
    pub tx_hash: String,
    pub log_index: i64,
    pub from_address: String,
    pub to_address: String,
    pub token_contract_address: String,
    pub block_number: i64,
    pub token_type: String,
    pub amount: Option<BigDecimal>,
    pub token_id: Option<BigDecimal>,
    pub amounts: Option<Vec<BigDecimal>>,
    pub token_ids: Option<Vec<BigDecimal>>,
}

impl From<TokenTransferDomain> for TokenTransferInsert {
    fn from(transfer: TokenTransferDomain) -> Self {
        Self {
            tx_hash: transfer.tx_hash,
            log_index: transfer.log_index,
            from_address: transfer.from_address,
            to_address: transfer.to_address,
            token_contract_address: transfer.token_contract_address,
            block_number: transfer.block_number,
            token_type: transfer.token_type.as_str().to_string(),
            amount: transfer.amount,
            token_id: transfer.token_id,
            amounts: transfer.amounts,
            token_ids: transfer.token_ids,
        }
    }
}
