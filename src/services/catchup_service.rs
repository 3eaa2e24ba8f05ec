use crate::config::EthereumConfig;
use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::repositories::block_repository::BlockRepository;
use crate::services::gap_detector::missing_ranges;
use crate::services::import_service::ImportService;
use crate::services::range_chunker::chunk_ranges;
use crate::{log_error, log_info};
use std::sync::Arc;

/// 一次性历史回填：进程启动时对每个配置的根区间跑一遍
/// 缺口检测 → 分片 → 逐片串行导入。
/// 串行 await 即天然背压，单根区间内的完成顺序确定；
/// 失败的分片记错误日志后丢弃，缺口由下一次启动重新检出。
pub struct CatchupService {
    config: Arc<EthereumConfig>,
    provider: Arc<dyn ProviderTrait>,
    block_repository: Arc<BlockRepository>,
    import_service: Arc<ImportService>,
}

impl CatchupService {
    pub fn new(
        config: Arc<EthereumConfig>,
        provider: Arc<dyn ProviderTrait>,
        block_repository: Arc<BlockRepository>,
        import_service: Arc<ImportService>,
    ) -> Self {
        Self {
            config,
            provider,
            block_repository,
            import_service,
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if !self.config.catchup_enabled {
            log_info!("回填未启用，跳过");
            return Ok(());
        }

        // "latest" 只在调度器启动时解析一次，所有根区间共用同一快照；
        // 移动的链头归实时跟踪负责
        let needs_head = self
            .config
            .ranges
            .iter()
            .any(|r| r.first.is_latest() || r.last.is_latest());
        let head = if needs_head {
            Some(self.provider.get_last_block_number().await?.as_u64())
        } else {
            None
        };

        for range_config in &self.config.ranges {
            let first = range_config.first.resolve(head)?;
            let last = range_config.last.resolve(head)?;
            self.backfill_root_range(first, last).await?;
        }

        log_info!("回填调度完成，共处理 {} 个根区间", self.config.ranges.len());
        Ok(())
    }

    async fn backfill_root_range(&self, first: u64, last: u64) -> Result<(), AppError> {
        let min = first.min(last);
        let max = first.max(last);

        let existing = self
            .block_repository
            .existing_block_numbers(min as i64, max as i64)
            .await?;
        let gaps = missing_ranges(min, max, &existing);
        if gaps.is_empty() {
            log_info!("根区间 [{}, {}] 无缺口，跳过", min, max);
            return Ok(());
        }

        let chunks = chunk_ranges(&gaps, self.config.batch_size);
        log_info!(
            "根区间 [{}, {}]: {} 个缺口，切成 {} 个批次开始回填",
            min,
            max,
            gaps.len(),
            chunks.len()
        );

        // 逐片串行：上一片完全落库后才开始下一片
        for (index, chunk) in chunks.iter().enumerate() {
            match self.import_service.import_range(*chunk).await {
                Ok(()) => {
                    log_info!("回填进度 {}/{}: 区间 {} 完成", index + 1, chunks.len(), chunk);
                }
                Err(e) => {
                    // 整区间失败：丢弃本片，不做部分提交也不自动重试
                    log_error!(
                        "回填区间 {} 整体失败，丢弃（下次启动重新检出缺口）: {}",
                        chunk,
                        e
                    );
                }
            }
        }

        log_info!("根区间 [{}, {}] 回填结束", min, max);
        Ok(())
    }
}
