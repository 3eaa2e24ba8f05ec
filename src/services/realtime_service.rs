use crate::config::EthereumConfig;
use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::models::BlockNumberRange;
use crate::services::import_service::ImportService;
use crate::{log_error, log_info, log_warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// 实时跟踪：头部轮询任务发现新块号推入有界通道，
/// 单消费者逐个按 [n, n] 区间走与回填完全相同的导入路径。
/// 有界通道 + 单消费者给出背压与顺序保证——导入跟不上时
/// 生产端在 send 上等待，而不是无限堆积通知。
pub struct RealtimeService {
    config: Arc<EthereumConfig>,
    provider: Arc<dyn ProviderTrait>,
    import_service: Arc<ImportService>,
}

impl RealtimeService {
    pub fn new(
        config: Arc<EthereumConfig>,
        provider: Arc<dyn ProviderTrait>,
        import_service: Arc<ImportService>,
    ) -> Self {
        Self {
            config,
            provider,
            import_service,
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if !self.config.realtime_enabled {
            log_info!("实时跟踪未启用，跳过");
            return Ok(());
        }

        let (tx, mut rx) = mpsc::channel::<u64>(self.config.realtime_queue_size.max(1));

        // 生产端：轮询链头，把新出现的区块号依次入队
        let provider = self.provider.clone();
        let poll_interval = Duration::from_secs(self.config.poll_interval_secs.max(1));
        let poller = tokio::spawn(async move {
            let mut last_seen: Option<u64> = None;
            loop {
                match provider.get_last_block_number().await {
                    Ok(head) => {
                        let head = head.as_u64();
                        let from = match last_seen {
                            // 首轮只从当前链头开始，历史归回填管
                            None => head,
                            Some(seen) => seen + 1,
                        };
                        for number in from..=head {
                            if tx.send(number).await.is_err() {
                                // 消费端退出，结束轮询
                                return;
                            }
                        }
                        last_seen = Some(head.max(last_seen.unwrap_or(head)));
                    }
                    Err(e) => {
                        log_warn!("链头查询失败，下个周期重试: {}", e);
                    }
                }
                sleep(poll_interval).await;
            }
        });

        log_info!(
            "实时跟踪启动: 轮询间隔 {}s, 队列容量 {}",
            self.config.poll_interval_secs,
            self.config.realtime_queue_size
        );

        // 单消费者：与回填共用同一条 Importer 路径
        while let Some(number) = rx.recv().await {
            match self
                .import_service
                .import_range(BlockNumberRange::single(number))
                .await
            {
                Ok(()) => {
                    log_info!("实时导入区块 {} 完成", number);
                }
                Err(e) => {
                    // 整区间失败：丢弃该块，缺口由下次回填检出
                    log_error!("实时导入区块 {} 失败，丢弃: {}", number, e);
                }
            }
        }

        poller.abort();
        Ok(())
    }
}
