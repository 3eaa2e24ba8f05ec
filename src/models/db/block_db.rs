use crate::models::db::schema::eth_block;
use crate::models::domain::block::BlockDomain;
use bigdecimal::BigDecimal;
use diesel::Insertable;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = eth_block)]
pub struct BlockInsert {
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
    pub timestamp: i64,
    pub consensus: bool,
    pub is_empty: bool,
}

impl From<BlockDomain> for BlockInsert {
    fn from(block: BlockDomain) -> Self {
        Self {
            block_number: block.block_number,
            block_hash: block.block_hash,
            parent_hash: block.parent_hash,
            miner_hash: block.miner_hash,
            difficulty: block.difficulty,
            total_difficulty: block.total_difficulty,
            gas_limit: block.gas_limit,
            gas_used: block.gas_used,
            size: block.size,
            nonce: block.nonce,
            timestamp: block.timestamp,
            consensus: block.consensus,
            is_empty: block.is_empty,
        }
    }
}
