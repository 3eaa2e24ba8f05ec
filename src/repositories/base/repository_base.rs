use crate::database::diesel::{DbConnection, DbPool};
use crate::errors::error::AppError;
use diesel::result::Error as DieselError;

/// 各仓储共享的池访问与错误映射
#[derive(Clone)]
pub struct RepositoryBase {
    pool: DbPool,
}

impl RepositoryBase {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn get_connection(&self) -> Result<DbConnection, AppError> {
        self.pool.get().map_err(AppError::ConnectionPool)
    }

    /// 转换 Diesel 查询错误（统一映射为 AppError）
    /// NotFound 与唯一约束冲突单独归类，便于上层区分
    pub fn map_diesel_error(&self, e: DieselError) -> AppError {
        match e {
            DieselError::NotFound => {
                AppError::NotFound("Resource not found in database".to_string())
            }
            DieselError::DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, info) => {
                AppError::Conflict(format!(
                    "Unique constraint violation: table={}, constraint={}, detail={}",
                    info.table_name().unwrap_or("unknown"),
                    info.constraint_name().unwrap_or("unknown"),
                    info.details().unwrap_or("no detail")
                ))
            }
            DieselError::DatabaseError(kind, info) => {
                AppError::DatabaseQuery(DieselError::DatabaseError(kind, info))
            }
            _ => AppError::DatabaseQuery(e),
        }
    }
}
