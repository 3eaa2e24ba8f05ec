use crate::database::diesel::DbPool;
use crate::errors::error::AppError;
use crate::models::TokenDomain;
use crate::models::schema::eth_token::dsl::eth_token;
use crate::models::schema::eth_token::{
    contract_address_hash, decimals, name, skip_metadata, symbol, token_type, total_supply,
};
use crate::models::schema::eth_token_db;
use crate::models::token_db::TokenInsert;
use crate::repositories::base::repository_base::RepositoryBase;
use diesel::upsert::excluded;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use std::collections::HashSet;
use tokio::task;

#[derive(Clone)]
pub struct TokenRepository {
    base: RepositoryBase,
}

impl TokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            base: RepositoryBase::new(pool),
        }
    }

    /// 分类器发现的裸合约（仅地址+标准）：已登记过的保持原行
    pub async fn save_discovered(&self, token: &TokenDomain) -> Result<(), AppError> {
        let self_clone = self.clone();
        let row = TokenInsert::from(token.clone());

        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            diesel::insert_into(eth_token_db)
                .values(&row)
                .on_conflict(contract_address_hash)
                .do_nothing()
                .execute(&mut conn)
                .map_err(|e| self_clone.base.map_diesel_error(e))?;
            Ok(())
        })
        .await?
    }

    /// 带元数据的完整 upsert：冲突时用新抓到的元数据覆盖
    /// （totalSupply 会随链上变动，允许刷新）
    pub async fn upsert_metadata(&self, token: &TokenDomain) -> Result<(), AppError> {
        let self_clone = self.clone();
        let row = TokenInsert::from(token.clone());

        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            diesel::insert_into(eth_token_db)
                .values(&row)
                .on_conflict(contract_address_hash)
                .do_update()
                .set((
                    name.eq(excluded(name)),
                    symbol.eq(excluded(symbol)),
                    decimals.eq(excluded(decimals)),
                    total_supply.eq(excluded(total_supply)),
                    token_type.eq(excluded(token_type)),
                    skip_metadata.eq(excluded(skip_metadata)),
                ))
                .execute(&mut conn)
                .map_err(|e| self_clone.base.map_diesel_error(e))?;
            Ok(())
        })
        .await?
    }

    /// 负缓存：元数据调用失败的合约打上 skip_metadata，
    /// 只动标记位，不覆盖可能已存在的元数据
    pub async fn mark_skip_metadata(&self, token: &TokenDomain) -> Result<(), AppError> {
        let self_clone = self.clone();
        let mut flagged = token.clone();
        flagged.skip_metadata = true;
        let row = TokenInsert::from(flagged);

        task::spawn_blocking(move || -> Result<(), AppError> {
            let mut conn = self_clone.base.get_connection()?;
            diesel::insert_into(eth_token_db)
                .values(&row)
                .on_conflict(contract_address_hash)
                .do_update()
                .set(skip_metadata.eq(true))
                .execute(&mut conn)
                .map_err(|e| self_clone.base.map_diesel_error(e))?;
            Ok(())
        })
        .await?
    }

    /// 本批次合约里已被打上 skip_metadata 的子集
    pub async fn skip_metadata_addresses(
        &self,
        addresses: Vec<String>,
    ) -> Result<HashSet<String>, AppError> {
        if addresses.is_empty() {
            return Ok(HashSet::new());
        }
        let self_clone = self.clone();

        task::spawn_blocking(move || -> Result<HashSet<String>, AppError> {
            let mut conn = self_clone.base.get_connection()?;
            let flagged = eth_token
                .filter(contract_address_hash.eq_any(addresses))
                .filter(skip_metadata.eq(true))
                .select(contract_address_hash)
                .load::<String>(&mut conn)
                .map_err(|e| self_clone.base.map_diesel_error(e))?;
            Ok(flagged.into_iter().collect())
        })
        .await?
    }
}
