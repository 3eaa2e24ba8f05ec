use super::ethereum_provider::{EthereumProvider, ProviderTrait};
use crate::errors::error::AppError;
use crate::log_warn;
use async_trait::async_trait;
use ethers::prelude::{H160, H256, U64, U256};
use ethers::providers::ProviderError;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Block, Bytes, Transaction, TransactionReceipt};
use ethers_providers::{Http, Middleware, Provider};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// 在裸 Provider 池外再包一层有界重试：指数退避 + 随机抖动。
/// 重试耗尽后返回错误，由调用方决定"跳过该区块、缺口留给下次回填"。
pub struct RetryAdapter {
    provider: Arc<EthereumProvider>,
    max_retries: usize,
    base_delay: Duration,
}

impl RetryAdapter {
    pub fn new(provider: Arc<EthereumProvider>, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            provider,
            max_retries,
            base_delay,
        }
    }

    async fn retry_call<T, Fut, F>(&self, mut f: F) -> Result<T, AppError>
    where
        F: FnMut(Arc<Provider<Http>>) -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, ProviderError>> + Send,
    {
        let mut last_error: Option<ProviderError> = None;
        for attempt in 0..self.max_retries {
            // 从第二次尝试开始退避
            if attempt > 0 {
                // 指数上限 2^10，防止 delay 无界膨胀
                let exponent = (attempt - 1).min(10);
                let base_ms = self.base_delay.as_millis() as u64;
                let delay_ms = base_ms * (1u64 << exponent);

                // 0~10% 抖动，避免多个重试任务同一时刻"齐射"节点
                let jitter = rand::thread_rng().gen_range(0..=(delay_ms / 10 + 1));
                let final_delay = Duration::from_millis(delay_ms + jitter);

                log_warn!(
                    "RPC 尝试失败，正在进行第 {} 次重试，等待 {:?}...",
                    attempt + 1,
                    final_delay
                );
                sleep(final_delay).await;
            }

            // 每次尝试都从池里取下一个节点
            let p = self.provider.get_provider();
            match f(p).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    log_warn!("RPC 调用失败 (第 {} 次): {:?}", attempt + 1, last_error);
                }
            }
        }
        Err(AppError::ProviderError(format!(
            "重试 {} 次失败，最后错误: {:?}",
            self.max_retries, last_error
        )))
    }
}

#[async_trait]
impl ProviderTrait for RetryAdapter {
    async fn get_last_block_number(&self) -> Result<U64, AppError> {
        self.retry_call(|p| async move { p.get_block_number().await })
            .await
    }

    async fn get_block_with_txs(
        &self,
        number: u64,
    ) -> Result<Option<Block<Transaction>>, AppError> {
        self.retry_call(move |p| async move { p.get_block_with_txs(number).await })
            .await
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, AppError> {
        self.retry_call(move |p| async move { p.get_transaction_receipt(tx_hash).await })
            .await
    }

    async fn get_balance(&self, address: H160, block_number: u64) -> Result<U256, AppError> {
        self.retry_call(move |p| async move {
            p.get_balance(address, Some(block_number.into())).await
        })
        .await
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.retry_call(move |p| async move {
            let tx = tx.clone();
            p.call(&tx, None).await
        })
        .await
    }
}
