use crate::config::EthereumConfig;
use crate::errors::error::AppError;
use crate::log_info;
use async_trait::async_trait;
use ethers::prelude::{H160, H256, U64, U256};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Block, Bytes, Transaction, TransactionReceipt};
use ethers_providers::{Http, Middleware, Provider};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// 链上读接口。实现方：EthereumProvider（裸池）与 RetryAdapter（带重试包装）。
#[async_trait]
pub trait ProviderTrait: Send + Sync {
    async fn get_last_block_number(&self) -> Result<U64, AppError>;
    async fn get_block_with_txs(&self, number: u64)
    -> Result<Option<Block<Transaction>>, AppError>;
    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, AppError>;
    async fn get_balance(&self, address: H160, block_number: u64) -> Result<U256, AppError>;
    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError>;
}

/// N 个 RPC 节点的轮询池。每次调用取 next = (cur+1) mod N，
/// 计数器为原子变量，可被 catchup 与 realtime 并发路径共用。
pub struct EthereumProvider {
    providers: Vec<Arc<Provider<Http>>>,
    index: AtomicUsize,
}

impl EthereumProvider {
    pub fn new(config: &EthereumConfig) -> Result<Self, AppError> {
        let mut providers = Vec::with_capacity(config.rpc_urls.len());
        for raw_url in &config.rpc_urls {
            let url = Url::parse(raw_url)
                .map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw_url, e)))?;
            let provider = Provider::<Http>::try_from(url.as_str())
                .map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw_url, e)))?;
            providers.push(Arc::new(provider));
        }

        if providers.is_empty() {
            return Err(AppError::InvalidUrl("rpc_urls 为空".to_string()));
        }
        log_info!("成功初始化 {} 个RPC Provider", providers.len());

        Ok(Self {
            providers,
            index: AtomicUsize::new(0),
        })
    }

    pub fn get_provider(&self) -> Arc<Provider<Http>> {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        self.providers[i % self.providers.len()].clone()
    }
}

#[async_trait]
impl ProviderTrait for EthereumProvider {
    async fn get_last_block_number(&self) -> Result<U64, AppError> {
        self.get_provider()
            .get_block_number()
            .await
            .map_err(AppError::from)
    }

    async fn get_block_with_txs(
        &self,
        number: u64,
    ) -> Result<Option<Block<Transaction>>, AppError> {
        self.get_provider()
            .get_block_with_txs(number)
            .await
            .map_err(AppError::from)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, AppError> {
        self.get_provider()
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(AppError::from)
    }

    async fn get_balance(&self, address: H160, block_number: u64) -> Result<U256, AppError> {
        self.get_provider()
            .get_balance(address, Some(block_number.into()))
            .await
            .map_err(AppError::from)
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.get_provider()
            .call(tx, None)
            .await
            .map_err(|e| AppError::ProviderError(format!("eth_call 失败: {}", e)))
    }
}
