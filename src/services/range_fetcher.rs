use crate::infrastructure::classifier::TransferClassifier;
use crate::infrastructure::parser::BlockParser;
use crate::infrastructure::provider::ProviderTrait;
use crate::{log_debug, log_warn};
use crate::models::{
    AddressDomain, BlockDomain, BlockNumberRange, TokenDomain, TokenTransferDomain,
    TransactionDomain,
};
use crate::services::balance_resolver::{AddressWatermarks, BalanceResolver};
use std::collections::HashMap;
use std::sync::Arc;

/// 一个区间物化出的全部待持久化记录
#[derive(Debug, Default)]
pub struct RangeImport {
    pub blocks: Vec<BlockDomain>,
    pub transactions: Vec<TransactionDomain>,
    pub addresses: Vec<AddressDomain>,
    pub tokens: Vec<TokenDomain>,
    pub token_transfers: Vec<TokenTransferDomain>,
}

/// 区间抓取：RPC → 解析 → 转账归类 → 水位收集 → 余额解析。
/// 单个区块/交易/日志的失败都就地跳过（缺口由下次回填补齐），
/// 本层不产生整区间级错误。
pub struct RangeFetcher {
    provider: Arc<dyn ProviderTrait>,
    classifier: Arc<TransferClassifier>,
    balance_resolver: BalanceResolver,
}

impl RangeFetcher {
    pub fn new(provider: Arc<dyn ProviderTrait>, classifier: Arc<TransferClassifier>) -> Self {
        Self {
            balance_resolver: BalanceResolver::new(provider.clone()),
            provider,
            classifier,
        }
    }

    pub async fn fetch_range(&self, range: &BlockNumberRange) -> RangeImport {
        let mut batch = RangeImport::default();
        let mut watermarks = AddressWatermarks::new();
        // 本批次发现的代币合约按地址去重，首次发现的标准生效
        let mut discovered: HashMap<String, TokenDomain> = HashMap::new();

        // 自高向低抓取；insert-ignore 语义下最终落库状态与顺序无关
        for number in (range.start..=range.end).rev() {
            self.fetch_block(number, &mut batch, &mut watermarks, &mut discovered)
                .await;
        }

        batch.tokens = discovered.into_values().collect();
        if !watermarks.is_empty() {
            log_debug!("区间 {} 待解析余额地址 {} 个", range, watermarks.len());
            batch.addresses = self.balance_resolver.resolve(watermarks).await;
        }
        batch
    }

    async fn fetch_block(
        &self,
        number: u64,
        batch: &mut RangeImport,
        watermarks: &mut AddressWatermarks,
        discovered: &mut HashMap<String, TokenDomain>,
    ) {
        let raw = match self.provider.get_block_with_txs(number).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log_warn!("区块 {} 节点返回空结果，跳过（缺口留待下次回填）", number);
                return;
            }
            Err(e) => {
                log_warn!("区块 {} 抓取重试耗尽，跳过: {}", number, e);
                return;
            }
        };

        let Some(block) = BlockParser::parse_block(&raw) else {
            return;
        };
        watermarks.observe_str(&block.miner_hash, number);

        for tx in &raw.transactions {
            // calldata selector 预筛：只有"长得像转账"的交易才去拉回执
            let receipt = if self.classifier.is_transfer_like(&tx.input) {
                match self.provider.get_transaction_receipt(tx.hash).await {
                    Ok(Some(receipt)) => Some(receipt),
                    Ok(None) => {
                        log_warn!("交易 {:?} 收据未找到，跳过归类", tx.hash);
                        None
                    }
                    Err(e) => {
                        log_warn!("交易 {:?} 获取收据失败（已重试），跳过归类: {}", tx.hash, e);
                        None
                    }
                }
            } else {
                None
            };

            if let Some(parsed) = BlockParser::parse_transaction(tx, receipt.as_ref(), number) {
                watermarks.observe(tx.from, number);
                if let Some(to) = tx.to {
                    watermarks.observe(to, number);
                }
                batch.transactions.push(parsed);
            }

            if let Some(receipt) = receipt {
                let (transfers, tokens) = self.classifier.classify_receipt(&receipt);
                for transfer in &transfers {
                    watermarks.observe_str(&transfer.from_address, number);
                    watermarks.observe_str(&transfer.to_address, number);
                    watermarks.observe_str(&transfer.token_contract_address, number);
                }
                for token in tokens {
                    discovered
                        .entry(token.contract_address_hash.clone())
                        .or_insert(token);
                }
                batch.token_transfers.extend(transfers);
            }
        }

        batch.blocks.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error::AppError;
    use crate::infrastructure::protocol::constants::{
        SELECTOR_ERC20_TRANSFER, TRANSFER_EVENT_TOPIC,
    };
    use crate::models::TokenType;
    use async_trait::async_trait;
    use ethers_core::types::transaction::eip2718::TypedTransaction;
    use ethers_core::types::{
        Block, Bytes, H64, H160, H256, Log, Transaction, TransactionReceipt, U64, U256,
    };

    const MINER: H160 = H160::repeat_byte(0xaa);
    const SENDER_1: H160 = H160::repeat_byte(0x01);
    const RECIPIENT_1: H160 = H160::repeat_byte(0x02);
    const SENDER_2: H160 = H160::repeat_byte(0x03);
    const TOKEN_CONTRACT: H160 = H160::repeat_byte(0x04);
    const TOKEN_RECIPIENT: H160 = H160::repeat_byte(0x05);

    fn erc20_tx_hash() -> H256 {
        H256::repeat_byte(0x22)
    }

    fn sample_block() -> Block<Transaction> {
        let plain_value_tx = Transaction {
            hash: H256::repeat_byte(0x21),
            from: SENDER_1,
            to: Some(RECIPIENT_1),
            value: U256::exp10(18),
            block_number: Some(U64::from(100u64)),
            transaction_index: Some(U64::zero()),
            gas: U256::from(21_000u64),
            ..Default::default()
        };
        let mut calldata = SELECTOR_ERC20_TRANSFER.to_vec();
        calldata.extend_from_slice(&[0u8; 64]);
        let erc20_tx = Transaction {
            hash: erc20_tx_hash(),
            from: SENDER_2,
            to: Some(TOKEN_CONTRACT),
            input: calldata.into(),
            block_number: Some(U64::from(100u64)),
            transaction_index: Some(U64::from(1u64)),
            gas: U256::from(60_000u64),
            ..Default::default()
        };
        Block {
            number: Some(U64::from(100u64)),
            hash: Some(H256::repeat_byte(0x11)),
            parent_hash: H256::repeat_byte(0x10),
            author: Some(MINER),
            timestamp: U256::from(1_700_000_000u64),
            nonce: Some(H64::zero()),
            transactions: vec![plain_value_tx, erc20_tx],
            ..Default::default()
        }
    }

    fn erc20_receipt() -> TransactionReceipt {
        let mut amount = [0u8; 32];
        U256::from(500u64).to_big_endian(&mut amount);
        let log = Log {
            address: TOKEN_CONTRACT,
            topics: vec![
                *TRANSFER_EVENT_TOPIC,
                H256::from(SENDER_2),
                H256::from(TOKEN_RECIPIENT),
            ],
            data: amount.to_vec().into(),
            transaction_hash: Some(erc20_tx_hash()),
            log_index: Some(U256::zero()),
            block_number: Some(U64::from(100u64)),
            ..Default::default()
        };
        TransactionReceipt {
            transaction_hash: erc20_tx_hash(),
            status: Some(U64::from(1u64)),
            cumulative_gas_used: U256::from(81_000u64),
            logs: vec![log],
            ..Default::default()
        }
    }

    struct StubProvider;

    #[async_trait]
    impl ProviderTrait for StubProvider {
        async fn get_last_block_number(&self) -> Result<U64, AppError> {
            Ok(U64::from(100u64))
        }
        async fn get_block_with_txs(
            &self,
            number: u64,
        ) -> Result<Option<Block<Transaction>>, AppError> {
            match number {
                100 => Ok(Some(sample_block())),
                // 101 模拟重试耗尽
                101 => Err(AppError::ProviderError("retries exhausted".to_string())),
                _ => Ok(None),
            }
        }
        async fn get_transaction_receipt(
            &self,
            tx_hash: H256,
        ) -> Result<Option<TransactionReceipt>, AppError> {
            if tx_hash == erc20_tx_hash() {
                Ok(Some(erc20_receipt()))
            } else {
                // 预筛应当挡掉纯转账交易，不该来查它的回执
                panic!("receipt fetched for non-transfer-like tx {tx_hash:?}");
            }
        }
        async fn get_balance(&self, _address: H160, _block_number: u64) -> Result<U256, AppError> {
            Ok(U256::from(1_000u64))
        }
        async fn call(&self, _tx: &TypedTransaction) -> Result<Bytes, AppError> {
            unreachable!("抓取路径不做元数据调用")
        }
    }

    fn fetcher() -> RangeFetcher {
        RangeFetcher::new(Arc::new(StubProvider), Arc::new(TransferClassifier::new()))
    }

    #[tokio::test]
    async fn one_block_end_to_end_materialization() {
        let batch = fetcher()
            .fetch_range(&BlockNumberRange::single(100))
            .await;

        assert_eq!(batch.blocks.len(), 1);
        assert!(!batch.blocks[0].is_empty);
        assert_eq!(batch.transactions.len(), 2);
        assert_eq!(batch.token_transfers.len(), 1);
        assert_eq!(batch.token_transfers[0].token_type, TokenType::Erc20);
        assert_eq!(batch.tokens.len(), 1);
        assert_eq!(batch.tokens[0].token_type, TokenType::Erc20);

        // 参与方：矿工 + 交易双方×2 + 日志收款方 + 代币合约 = 6 个去重地址
        assert_eq!(batch.addresses.len(), 6);
        for address in &batch.addresses {
            assert_eq!(address.fetched_coin_balance_block_number, Some(100));
            assert!(address.fetched_coin_balance.is_some());
        }

        // 纯转账交易未取回执 → status 为空；ERC-20 交易带回执
        let plain = batch
            .transactions
            .iter()
            .find(|tx| tx.transaction_index == 0)
            .unwrap();
        assert_eq!(plain.status, None);
        let transfer_like = batch
            .transactions
            .iter()
            .find(|tx| tx.transaction_index == 1)
            .unwrap();
        assert_eq!(transfer_like.status, Some(1));
        assert!(transfer_like.cumulative_gas_used.is_some());
    }

    #[tokio::test]
    async fn failed_block_is_skipped_and_gap_persists() {
        let batch = fetcher()
            .fetch_range(&BlockNumberRange::new(100, 102))
            .await;

        // 101 重试耗尽、102 返回空 → 只有 100 被物化
        assert_eq!(batch.blocks.len(), 1);
        assert_eq!(batch.blocks[0].block_number, 100);
    }
}
