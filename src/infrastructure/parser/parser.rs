use crate::errors::error::AppError;
use crate::log_warn;
use crate::models::domain::block::BlockDomain;
use crate::models::domain::transaction::{TX_STATUS_ERROR, TX_STATUS_OK, TransactionDomain};
use crate::utils::format::{opt_u256_to_bigdecimal, u256_to_bigdecimal};
use crate::utils::{h160_to_string, h256_to_string, option_u64_to_i64, u256_to_i64};
use ethers_core::types::{Block, Transaction, TransactionReceipt};

/// 原始 RPC 载荷 → 领域记录的纯转换。
/// 总函数：畸形输入不 panic 不向上抛，记一条 warn 并返回 None，
/// 调用方只跳过这一条记录，批次继续。
pub struct BlockParser;

impl BlockParser {
    pub fn parse_block(raw: &Block<Transaction>) -> Option<BlockDomain> {
        match Self::try_parse_block(raw) {
            Ok(block) => Some(block),
            Err(e) => {
                log_warn!(
                    "区块 {:?} 载荷解析失败，跳过: {}",
                    raw.number,
                    e
                );
                None
            }
        }
    }

    fn try_parse_block(raw: &Block<Transaction>) -> Result<BlockDomain, AppError> {
        let block_number = option_u64_to_i64(raw.number)
            .map_err(|_| AppError::InvalidBlockNumber("区块缺少 number 字段".to_string()))?;
        let block_hash = raw
            .hash
            .map(h256_to_string)
            .ok_or_else(|| AppError::ParserError("区块缺少 hash 字段".to_string()))?;
        let miner_hash = raw
            .author
            .map(h160_to_string)
            .ok_or_else(|| AppError::ParserError("区块缺少 miner 字段".to_string()))?;

        // unix 秒 → 毫秒
        let timestamp = u256_to_i64(raw.timestamp)?
            .checked_mul(1000)
            .ok_or_else(|| AppError::Conversion("时间戳毫秒换算溢出".to_string()))?;

        let size = raw
            .size
            .map(|s| u256_to_i64(s).map(|v| v as i32))
            .transpose()?;

        Ok(BlockDomain {
            block_number,
            block_hash,
            parent_hash: h256_to_string(raw.parent_hash),
            miner_hash,
            difficulty: u256_to_bigdecimal(raw.difficulty),
            total_difficulty: opt_u256_to_bigdecimal(raw.total_difficulty),
            gas_limit: u256_to_bigdecimal(raw.gas_limit),
            gas_used: u256_to_bigdecimal(raw.gas_used),
            size,
            nonce: raw
                .nonce
                .map(|n| format!("{:#x}", n))
                .unwrap_or_else(|| "0x0000000000000000".to_string()),
            timestamp,
            // 无分叉处理，入库即规范链
            consensus: true,
            is_empty: raw.transactions.is_empty(),
        })
    }

    /// receipt 仅对 input 预筛命中的交易存在；None 时 status 与
    /// cumulative_gas_used 留空。
    pub fn parse_transaction(
        raw: &Transaction,
        receipt: Option<&TransactionReceipt>,
        block_number: u64,
    ) -> Option<TransactionDomain> {
        match Self::try_parse_transaction(raw, receipt, block_number) {
            Ok(tx) => Some(tx),
            Err(e) => {
                log_warn!("交易 {:?} 载荷解析失败，跳过: {}", raw.hash, e);
                None
            }
        }
    }

    fn try_parse_transaction(
        raw: &Transaction,
        receipt: Option<&TransactionReceipt>,
        block_number: u64,
    ) -> Result<TransactionDomain, AppError> {
        // 节点返回的交易应带区块号；缺省时回退到所属区块
        let block_number = raw
            .block_number
            .map(|n| n.as_u64())
            .unwrap_or(block_number) as i64;

        let transaction_index = option_u64_to_i64(raw.transaction_index)
            .map_err(|_| AppError::ParserError("交易缺少 transaction_index".to_string()))?
            as i32;

        let status = receipt.and_then(|r| r.status).map(|s| {
            if s.is_zero() {
                TX_STATUS_ERROR
            } else {
                TX_STATUS_OK
            }
        });

        Ok(TransactionDomain {
            tx_hash: h256_to_string(raw.hash),
            block_number,
            from_address: h160_to_string(raw.from),
            to_address: raw.to.map(h160_to_string),
            value: u256_to_bigdecimal(raw.value),
            gas: u256_to_bigdecimal(raw.gas),
            gas_price: opt_u256_to_bigdecimal(raw.gas_price),
            cumulative_gas_used: receipt.map(|r| u256_to_bigdecimal(r.cumulative_gas_used)),
            transaction_index,
            nonce: u256_to_i64(raw.nonce)?,
            r: u256_to_bigdecimal(raw.r),
            s: u256_to_bigdecimal(raw.s),
            v: raw.v.as_u64() as i64,
            status,
            max_fee_per_gas: opt_u256_to_bigdecimal(raw.max_fee_per_gas),
            max_priority_fee_per_gas: opt_u256_to_bigdecimal(raw.max_priority_fee_per_gas),
            transaction_type: raw.transaction_type.map(|t| t.as_u64() as i32),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::{H64, H160, H256, U64, U256};

    fn sample_block() -> Block<Transaction> {
        Block {
            number: Some(U64::from(100u64)),
            hash: Some(H256::repeat_byte(0x11)),
            parent_hash: H256::repeat_byte(0x10),
            author: Some(H160::repeat_byte(0xaa)),
            difficulty: U256::from(2u64),
            gas_limit: U256::from(30_000_000u64),
            gas_used: U256::from(21_000u64),
            timestamp: U256::from(1_700_000_000u64),
            nonce: Some(H64::zero()),
            ..Default::default()
        }
    }

    #[test]
    fn block_timestamp_is_unix_millis() {
        let block = BlockParser::parse_block(&sample_block()).unwrap();
        assert_eq!(block.timestamp, 1_700_000_000_000);
        assert!(block.consensus);
        assert!(block.is_empty);
    }

    #[test]
    fn pending_block_without_number_is_skipped() {
        let mut raw = sample_block();
        raw.number = None;
        assert!(BlockParser::parse_block(&raw).is_none());
    }

    #[test]
    fn block_with_transactions_is_not_empty() {
        let mut raw = sample_block();
        raw.transactions.push(Transaction {
            hash: H256::repeat_byte(0x22),
            transaction_index: Some(U64::zero()),
            ..Default::default()
        });
        let block = BlockParser::parse_block(&raw).unwrap();
        assert!(!block.is_empty);
    }

    #[test]
    fn transaction_without_receipt_has_no_status() {
        let raw = Transaction {
            hash: H256::repeat_byte(0x22),
            block_number: Some(U64::from(100u64)),
            transaction_index: Some(U64::zero()),
            value: U256::from(1u64),
            ..Default::default()
        };
        let tx = BlockParser::parse_transaction(&raw, None, 100).unwrap();
        assert_eq!(tx.status, None);
        assert_eq!(tx.cumulative_gas_used, None);
        assert_eq!(tx.block_number, 100);
    }

    #[test]
    fn failed_receipt_maps_to_error_status() {
        let raw = Transaction {
            hash: H256::repeat_byte(0x22),
            transaction_index: Some(U64::zero()),
            ..Default::default()
        };
        let receipt = TransactionReceipt {
            status: Some(U64::zero()),
            cumulative_gas_used: U256::from(21_000u64),
            ..Default::default()
        };
        let tx = BlockParser::parse_transaction(&raw, Some(&receipt), 7).unwrap();
        assert_eq!(tx.status, Some(TX_STATUS_ERROR));
        assert_eq!(tx.block_number, 7);
    }

    #[test]
    fn malformed_transaction_is_skipped_not_thrown() {
        // transaction_index 缺失视为畸形载荷
        let raw = Transaction {
            hash: H256::repeat_byte(0x22),
            transaction_index: None,
            ..Default::default()
        };
        assert!(BlockParser::parse_transaction(&raw, None, 1).is_none());
    }
}
