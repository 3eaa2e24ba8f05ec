use crate::database::diesel::DbPool;
use crate::errors::error::AppError;
use crate::models::AddressDomain;
use crate::models::address_db::AddressInsert;
use crate::models::schema::eth_address::dsl::eth_address;
use crate::models::schema::eth_address::{
    address_hash, fetched_coin_balance, fetched_coin_balance_block_number,
};
use crate::models::schema::eth_address_db;
use crate::repositories::base::repository_base::RepositoryBase;
use diesel::{BoolExpressionMethods, Connection, ExpressionMethods, QueryDsl, RunQueryDsl};
use tokio::task;

#[derive(Clone)]
pub struct AddressRepository {
    base: RepositoryBase,
}

impl AddressRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            base: RepositoryBase::new(pool),
        }
    }

    /// 先 insert-ignore 占位：已存在的地址保持原行不动，
    /// 余额覆盖交给 update_balances 的水位比较
    pub async fn batch_save(&self, entities: &[AddressDomain]) -> Result<(), AppError> {
        if entities.is_empty() {
            return Ok(());
        }
        let self_clone = self.clone();
        let entities_clone = entities.to_vec();

        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            let rows: Vec<AddressInsert> = entities_clone
                .into_iter()
                .map(AddressInsert::from)
                .collect();

            conn.transaction::<_, AppError, _>(|conn| {
                for chunk in rows.chunks(1000) {
                    diesel::insert_into(eth_address_db)
                        .values(chunk)
                        .on_conflict(address_hash)
                        .do_nothing()
                        .execute(conn)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))?;
                }
                Ok(())
            })
        })
        .await?
    }

    /// 带水位比较的条件更新（compare-and-set）：
    /// 仅当新水位严格大于已存水位（或从未有水位）时覆盖余额，
    /// 回填与实时乱序到达时旧读数不会倒灌。
    pub async fn update_balances(&self, entities: &[AddressDomain]) -> Result<(), AppError> {
        let updates: Vec<AddressDomain> = entities
            .iter()
            .filter(|a| {
                a.fetched_coin_balance.is_some() && a.fetched_coin_balance_block_number.is_some()
            })
            .cloned()
            .collect();
        if updates.is_empty() {
            return Ok(());
        }

        let self_clone = self.clone();
        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            for update in updates {
                let watermark = update.fetched_coin_balance_block_number;
                diesel::update(
                    eth_address
                        .filter(address_hash.eq(&update.address_hash))
                        .filter(
                            fetched_coin_balance_block_number
                                .lt(watermark)
                                .or(fetched_coin_balance_block_number.is_null()),
                        ),
                )
                .set((
                    fetched_coin_balance.eq(update.fetched_coin_balance.clone()),
                    fetched_coin_balance_block_number.eq(watermark),
                ))
                .execute(&mut conn)
                .map_err(|e| self_clone.base.map_diesel_error(e))?;
            }
            Ok(())
        })
        .await?
    }
}
