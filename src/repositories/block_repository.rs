use crate::database::diesel::DbPool;
use crate::errors::error::AppError;
use crate::models::BlockDomain;
use crate::models::block_db::BlockInsert;
use crate::models::schema::eth_block::dsl::eth_block;
use crate::models::schema::eth_block::{block_number, consensus};
use crate::models::schema::eth_block_db;
use crate::repositories::base::repository_base::RepositoryBase;
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl};
use tokio::task;

#[derive(Clone)]
pub struct BlockRepository {
    base: RepositoryBase,
}

impl BlockRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            base: RepositoryBase::new(pool),
        }
    }

    /// insert-ignore：区块号冲突即已有规范行，直接丢弃，重复导入安全
    pub async fn batch_save(&self, entities: &[BlockDomain]) -> Result<(), AppError> {
        if entities.is_empty() {
            return Ok(());
        }
        let self_clone = self.clone();
        let entities_clone = entities.to_vec();

        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            let rows: Vec<BlockInsert> = entities_clone.into_iter().map(BlockInsert::from).collect();

            conn.transaction::<_, AppError, _>(|conn| {
                for chunk in rows.chunks(1000) {
                    diesel::insert_into(eth_block_db)
                        .values(chunk)
                        .on_conflict(block_number)
                        .do_nothing()
                        .execute(conn)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))?;
                }
                Ok(())
            })
        })
        .await?
    }

    /// 查询 [min, max] 内已有规范行的区块号，升序。
    /// 缺口 = 区间补集，由 gap_detector 在内存中计算。
    pub async fn existing_block_numbers(&self, min: i64, max: i64) -> Result<Vec<i64>, AppError> {
        let self_clone = self.clone();
        task::spawn_blocking(move || -> Result<Vec<i64>, AppError> {
            let mut conn = self_clone.base.get_connection()?;
            let numbers = eth_block
                .filter(block_number.ge(min))
                .filter(block_number.le(max))
                .filter(consensus.eq(true))
                .select(block_number)
                .order_by(block_number.asc())
                .load::<i64>(&mut conn)
                .map_err(|e| self_clone.base.map_diesel_error(e))?;
            Ok(numbers)
        })
        .await?
    }
}
