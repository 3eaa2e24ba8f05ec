use crate::infrastructure::provider::ProviderTrait;
use crate::log_warn;
use crate::models::AddressDomain;
use crate::utils::format::u256_to_bigdecimal;
use crate::utils::{h160_to_string, parse_address};
use ethers_core::types::H160;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// 一次区间抓取过程中出现过的地址 → 所见最高区块号。
/// 来源：出块者、交易双方、代币转账参与方（from/to/合约）。
#[derive(Debug, Default)]
pub struct AddressWatermarks {
    inner: HashMap<H160, u64>,
}

impl AddressWatermarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, address: H160, block_number: u64) {
        self.inner
            .entry(address)
            .and_modify(|watermark| *watermark = (*watermark).max(block_number))
            .or_insert(block_number);
    }

    /// 领域记录里的地址已格式化为字符串，回灌时解析回 H160；
    /// 解析不了的（理论上不存在）直接丢弃
    pub fn observe_str(&mut self, address: &str, block_number: u64) {
        if let Ok(parsed) = parse_address(address) {
            self.observe(parsed, block_number);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    fn into_entries(self) -> Vec<(H160, u64)> {
        self.inner.into_iter().collect()
    }
}

/// 扫描结束后按水位并发解析余额。
/// 单个地址失败只降级为"余额未知"，绝不让整批失败。
pub struct BalanceResolver {
    provider: Arc<dyn ProviderTrait>,
}

impl BalanceResolver {
    pub fn new(provider: Arc<dyn ProviderTrait>) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, watermarks: AddressWatermarks) -> Vec<AddressDomain> {
        let tasks = watermarks.into_entries().into_iter().map(|(address, block_number)| {
            let provider = self.provider.clone();
            async move {
                match provider.get_balance(address, block_number).await {
                    Ok(balance) => AddressDomain {
                        address_hash: h160_to_string(address),
                        fetched_coin_balance: Some(u256_to_bigdecimal(balance)),
                        fetched_coin_balance_block_number: Some(block_number as i64),
                    },
                    Err(e) => {
                        log_warn!(
                            "地址 {} 在区块 {} 的余额查询失败，记为未知: {}",
                            h160_to_string(address),
                            block_number,
                            e
                        );
                        AddressDomain::unknown(h160_to_string(address))
                    }
                }
            }
        });

        join_all(tasks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error::AppError;
    use async_trait::async_trait;
    use ethers_core::types::transaction::eip2718::TypedTransaction;
    use ethers_core::types::{Block, Bytes, H256, Transaction, TransactionReceipt, U64, U256};

    #[test]
    fn watermark_keeps_highest_seen_block() {
        let mut watermarks = AddressWatermarks::new();
        let addr = H160::repeat_byte(0x01);
        watermarks.observe(addr, 50);
        watermarks.observe(addr, 40); // 旧读数不回退
        watermarks.observe(addr, 60);
        let entries = watermarks.into_entries();
        assert_eq!(entries, vec![(addr, 60)]);
    }

    #[test]
    fn distinct_addresses_tracked_separately() {
        let mut watermarks = AddressWatermarks::new();
        watermarks.observe(H160::repeat_byte(0x01), 5);
        watermarks.observe_str(&h160_to_string(H160::repeat_byte(0x02)), 9);
        assert_eq!(watermarks.len(), 2);
    }

    /// 偶数字节地址查询失败，奇数成功
    struct HalfFailingProvider;

    #[async_trait]
    impl ProviderTrait for HalfFailingProvider {
        async fn get_last_block_number(&self) -> Result<U64, AppError> {
            unreachable!("余额测试不触发")
        }
        async fn get_block_with_txs(
            &self,
            _number: u64,
        ) -> Result<Option<Block<Transaction>>, AppError> {
            unreachable!("余额测试不触发")
        }
        async fn get_transaction_receipt(
            &self,
            _tx_hash: H256,
        ) -> Result<Option<TransactionReceipt>, AppError> {
            unreachable!("余额测试不触发")
        }
        async fn get_balance(&self, address: H160, _block_number: u64) -> Result<U256, AppError> {
            if address.as_bytes()[0] % 2 == 0 {
                Err(AppError::ProviderError("node unavailable".to_string()))
            } else {
                Ok(U256::from(1_000u64))
            }
        }
        async fn call(&self, _tx: &TypedTransaction) -> Result<Bytes, AppError> {
            unreachable!("余额测试不触发")
        }
    }

    #[tokio::test]
    async fn failed_lookup_degrades_to_unknown_balance() {
        let resolver = BalanceResolver::new(Arc::new(HalfFailingProvider));
        let mut watermarks = AddressWatermarks::new();
        watermarks.observe(H160::repeat_byte(0x01), 100); // 成功
        watermarks.observe(H160::repeat_byte(0x02), 100); // 失败
        let mut resolved = resolver.resolve(watermarks).await;
        resolved.sort_by(|a, b| a.address_hash.cmp(&b.address_hash));

        assert_eq!(resolved.len(), 2);
        assert!(resolved[0].fetched_coin_balance.is_some());
        assert_eq!(resolved[0].fetched_coin_balance_block_number, Some(100));
        assert!(resolved[1].fetched_coin_balance.is_none());
        assert!(resolved[1].fetched_coin_balance_block_number.is_none());
    }
}
