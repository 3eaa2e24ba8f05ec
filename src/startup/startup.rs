use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::database::diesel::create_db_pool;
use crate::errors::error::AppError;
use crate::infrastructure::classifier::TransferClassifier;
use crate::infrastructure::provider::{EthereumProvider, ProviderTrait, RetryAdapter};
use crate::log_info;
use crate::repositories::address_repository::AddressRepository;
use crate::repositories::block_repository::BlockRepository;
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::token_transfer_repository::TokenTransferRepository;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::services::range_fetcher::RangeFetcher;
use crate::services::token_metadata::TokenMetadataService;
use crate::services::{CatchupService, ImportService, RealtimeService};

/// 应用程序启动与装配（仅后台索引服务，无HTTP API）
pub struct Application {
    pub catchup_service: Arc<CatchupService>,
    pub realtime_service: Arc<RealtimeService>,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl Application {
    /// 构建应用实例：池 → 仓储 → Provider(+重试) → 分类/抓取 → 导入 → 调度
    pub async fn build(config: Config) -> Result<Self> {
        let ethereum_config = Arc::new(config.ethereum);

        let db_pool = create_db_pool(&config.database)?;
        log_info!("Diesel database pool initialized successfully");

        let block_repo = Arc::new(BlockRepository::new(db_pool.clone()));
        let tx_repo = Arc::new(TransactionRepository::new(db_pool.clone()));
        let address_repo = Arc::new(AddressRepository::new(db_pool.clone()));
        let token_repo = Arc::new(TokenRepository::new(db_pool.clone()));
        let token_transfer_repo = Arc::new(TokenTransferRepository::new(db_pool));

        // 1. 基础 provider 池（多 RPC 节点轮询）
        let eth_provider = Arc::new(EthereumProvider::new(ethereum_config.as_ref())?);
        // 2. 包裹重试适配器（指数退避+抖动）
        let provider = Arc::new(RetryAdapter::new(
            eth_provider,
            ethereum_config.max_retries,
            Duration::from_secs(ethereum_config.base_delay_secs),
        )) as Arc<dyn ProviderTrait>;

        // 3. 归类与抓取管线
        let classifier = Arc::new(TransferClassifier::new());
        let fetcher = RangeFetcher::new(provider.clone(), classifier);
        let metadata = TokenMetadataService::new(provider.clone());

        // 4. 导入器：回填与实时共用
        let import_service = Arc::new(ImportService::new(
            fetcher,
            metadata,
            block_repo.clone(),
            tx_repo,
            address_repo,
            token_repo,
            token_transfer_repo,
        ));

        let catchup_service = Arc::new(CatchupService::new(
            ethereum_config.clone(),
            provider.clone(),
            block_repo,
            import_service.clone(),
        ));
        let realtime_service = Arc::new(RealtimeService::new(
            ethereum_config,
            provider,
            import_service,
        ));

        Ok(Self {
            catchup_service,
            realtime_service,
        })
    }

    /// 启动核心服务：回填任务 + 实时跟踪任务，等待 Ctrl+C 退出。
    /// 两条路径可并发：区块/交易/转账 insert-ignore、余额按水位
    /// compare-and-set，交错写入是安全的。
    pub async fn run(self) -> anyhow::Result<()> {
        let catchup = self.catchup_service.clone();
        tokio::spawn(async move {
            if let Err(e) = catchup.run().await {
                crate::log_error!("回填调度失败: {:?}", e);
            }
        });

        let realtime = self.realtime_service.clone();
        tokio::spawn(async move {
            if let Err(e) = realtime.run().await {
                crate::log_error!("实时跟踪退出: {:?}", e);
            }
        });

        log_info!("✔️ All indexing tasks started");

        // 等待 Ctrl+C 退出；进程中断后重启是安全的：
        // 已落库的行会被跳过，缺口由回填重新计算
        tokio::signal::ctrl_c().await?;
        log_info!("⚠️  Received shutdown signal, exiting...");
        Ok(())
    }
}
