use crate::database::diesel::DbPool;
use crate::errors::error::AppError;
use crate::models::TokenTransferDomain;
use crate::models::schema::eth_token_transfer::{log_index, tx_hash};
use crate::models::schema::eth_token_transfer_db;
use crate::models::token_transfer_db::TokenTransferInsert;
use crate::repositories::base::repository_base::RepositoryBase;
use diesel::{Connection, RunQueryDsl};
use tokio::task;

#[derive(Clone)]
pub struct TokenTransferRepository {
    base: RepositoryBase,
}

impl TokenTransferRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            base: RepositoryBase::new(pool),
        }
    }

    /// (tx_hash, log_index) 冲突即重复导入，直接忽略
    pub async fn batch_save(&self, entities: &[TokenTransferDomain]) -> Result<(), AppError> {
        if entities.is_empty() {
            return Ok(());
        }
        let self_clone = self.clone();
        let entities_clone = entities.to_vec();

        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            let rows: Vec<TokenTransferInsert> = entities_clone
                .into_iter()
                .map(TokenTransferInsert::from)
                .collect();

            conn.transaction::<_, AppError, _>(|conn| {
                for chunk in rows.chunks(1000) {
                    diesel::insert_into(eth_token_transfer_db)
                        .values(chunk)
                        .on_conflict((tx_hash, log_index))
                        .do_nothing()
                        .execute(conn)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))?;
                }
                Ok(())
            })
        })
        .await?
    }
}
