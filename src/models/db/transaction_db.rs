use crate::models::db::schema::eth_transaction;
use crate::models::domain::transaction::TransactionDomain;
use bigdecimal::BigDecimal;
use diesel::Insertable;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = eth_transaction)]
pub struct TransactionInsert {
    pub tx_hash: String,
    pub block_number: i64,
    pub from_address: String,
    pub to_address: Option<String>,
    pub value: BigDecimal,
    pub gas: BigDecimal,
    pub gas_price: Option<BigDecimal>,
    pub cumulative_gas_used: Option<BigDecimal>,
    pub transaction_index: i32,
    pub nonce: i64,
    pub r: BigDecimal,
    pub s: BigDecimal,
    pub v: i64,
    pub status: Option<i16>,
    pub max_fee_per_gas: Option<BigDecimal>,
    pub max_priority_fee_per_gas: Option<BigDecimal>,
    pub transaction_type: Option<i32>,
}

impl From<TransactionDomain> for TransactionInsert {
    fn from(tx: TransactionDomain) -> Self {
        Self {
            tx_hash: tx.tx_hash,
            block_number: tx.block_number,
            from_address: tx.from_address,
            to_address: tx.to_address,
            value: tx.value,
            gas: tx.gas,
            gas_price: tx.gas_price,
            cumulative_gas_used: tx.cumulative_gas_used,
            transaction_index: tx.transaction_index,
            nonce: tx.nonce,
            r: tx.r,
            s: tx.s,
            v: tx.v,
            status: tx.status,
            max_fee_per_gas: tx.max_fee_per_gas,
            max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
            transaction_type: tx.transaction_type,
        }
    }
}
