//! 数据库层
//!
//! 嵌入式 SurrealDB (RocksDB 后端)。启动时幂等地应用 schema，
//! 所有表访问都通过 [`repository`] 中的结构体仓库。

pub mod repository;
pub mod schema;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// 命名空间 / 数据库名
const NAMESPACE: &str = "resolveit";
const DATABASE: &str = "main";

/// Database service holding the embedded SurrealDB handle
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `db_path` and apply the
    /// schema.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;

        schema::define(&db)
            .await
            .map_err(|e| AppError::Database(format!("Failed to apply schema: {e}")))?;

        tracing::info!("Database ready (SurrealDB/RocksDB at {})", db_path);

        Ok(Self { db })
    }
}
