use crate::database::diesel::DbPool;
use crate::errors::error::AppError;
use crate::models::TransactionDomain;
use crate::models::schema::eth_transaction::tx_hash;
use crate::models::schema::eth_transaction_db;
use crate::models::transaction_db::TransactionInsert;
use crate::repositories::base::repository_base::RepositoryBase;
use diesel::{Connection, RunQueryDsl};
use tokio::task;

#[derive(Clone)]
pub struct TransactionRepository {
    base: RepositoryBase,
}

impl TransactionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            base: RepositoryBase::new(pool),
        }
    }

    pub async fn batch_save(&self, entities: &[TransactionDomain]) -> Result<(), AppError> {
        if entities.is_empty() {
            return Ok(());
        }
        let self_clone = self.clone();
        let entities_clone = entities.to_vec();

        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            let rows: Vec<TransactionInsert> = entities_clone
                .into_iter()
                .map(TransactionInsert::from)
                .collect();

            conn.transaction::<_, AppError, _>(|conn| {
                for chunk in rows.chunks(1000) {
                    diesel::insert_into(eth_transaction_db)
                        .values(chunk)
                        .on_conflict(tx_hash)
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
