use crate::errors::error::AppError;
use crate::log_info;
use crate::log_warn;
use crate::models::{BlockNumberRange, TokenDomain, TokenType};
use crate::repositories::address_repository::AddressRepository;
use crate::repositories::block_repository::BlockRepository;
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::token_transfer_repository::TokenTransferRepository;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::services::range_fetcher::{RangeFetcher, RangeImport};
use crate::services::token_metadata::TokenMetadataService;
use std::sync::Arc;

/// 单个区间的导入编排。回填与实时共用这一条路径，
/// 保证两种来源走同一套归一化/去重逻辑。
/// 区间内部的单条失败已在抓取层消化；本层抛出的错误属于
/// 整区间失败（如存储不可用），由调度方记日志后丢弃整个区间。
pub struct ImportService {
    fetcher: RangeFetcher,
    metadata: TokenMetadataService,
    block_repository: Arc<BlockRepository>,
    transaction_repository: Arc<TransactionRepository>,
    address_repository: Arc<AddressRepository>,
    token_repository: Arc<TokenRepository>,
    token_transfer_repository: Arc<TokenTransferRepository>,
}

impl ImportService {
    pub fn new(
        fetcher: RangeFetcher,
        metadata: TokenMetadataService,
        block_repository: Arc<BlockRepository>,
        transaction_repository: Arc<TransactionRepository>,
        address_repository: Arc<AddressRepository>,
        token_repository: Arc<TokenRepository>,
        token_transfer_repository: Arc<TokenTransferRepository>,
    ) -> Self {
        Self {
            fetcher,
            metadata,
            block_repository,
            transaction_repository,
            address_repository,
            token_repository,
            token_transfer_repository,
        }
    }

    pub async fn import_range(&self, range: BlockNumberRange) -> Result<(), AppError> {
        let batch = self.fetcher.fetch_range(&range).await;
        log_info!(
            "区间 {} 物化完成: {} 区块 / {} 交易 / {} 转账 / {} 地址",
            range,
            batch.blocks.len(),
            batch.transactions.len(),
            batch.token_transfers.len(),
            batch.addresses.len()
        );
        self.persist(batch).await
    }

    /// 持久化顺序固定：
    /// (a) 区块+交易 insert-ignore
    /// (b) 地址 insert-ignore，随后按水位条件更新余额
    /// (c) 代币登记/元数据补全
    /// (d) 转账 insert-ignore
    async fn persist(&self, batch: RangeImport) -> Result<(), AppError> {
        self.block_repository.batch_save(&batch.blocks).await?;
        self.transaction_repository
            .batch_save(&batch.transactions)
            .await?;

        self.address_repository.batch_save(&batch.addresses).await?;
        self.address_repository
            .update_balances(&batch.addresses)
            .await?;

        self.catalog_tokens(&batch.tokens).await?;

        self.token_transfer_repository
            .batch_save(&batch.token_transfers)
            .await?;
        Ok(())
    }

    /// ERC-20 合约补元数据后 upsert；调用失败的打 skip_metadata
    /// 负缓存，后续批次不再反复重试同一个非标准合约。
    /// 其它标准只登记地址与类型。
    async fn catalog_tokens(&self, tokens: &[TokenDomain]) -> Result<(), AppError> {
        if tokens.is_empty() {
            return Ok(());
        }

        let erc20_addresses: Vec<String> = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::Erc20)
            .map(|t| t.contract_address_hash.clone())
            .collect();
        let skip = self
            .token_repository
            .skip_metadata_addresses(erc20_addresses)
            .await?;

        for token in tokens {
            if token.token_type != TokenType::Erc20 {
                self.token_repository.save_discovered(token).await?;
                continue;
            }
            if skip.contains(&token.contract_address_hash) {
                // 负缓存命中：跳过元数据调用，也无需重复登记
                continue;
            }
            match self.metadata.fetch(&token.contract_address_hash).await {
                Ok(metadata) => {
                    let enriched = TokenMetadataService::apply(token, metadata);
                    self.token_repository.upsert_metadata(&enriched).await?;
                }
                Err(e) => {
                    log_warn!(
                        "合约 {} 元数据调用失败，标记 skip_metadata: {}",
                        token.contract_address_hash,
                        e
                    );
                    self.token_repository.mark_skip_metadata(token).await?;
                }
            }
        }
        Ok(())
    }
}
