//! Database Module
//!
//! 嵌入式 SurrealDB：运行时使用 RocksDB 引擎，测试使用内存引擎。

pub mod repository;

use std::path::Path;

use anyhow::Context;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// 打开数据库并初始化 schema
pub async fn init(work_dir: &str) -> anyhow::Result<Surreal<Db>> {
    let db_path = Path::new(work_dir).join("database").join("pomelo.db");
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let db = Surreal::new::<RocksDb>(db_path.to_string_lossy().as_ref())
        .await
        .context("Failed to open embedded database")?;
    db.use_ns("pomelo")
        .use_db("main")
        .await
        .context("Failed to select namespace")?;

    define_schema(&db).await?;

    tracing::info!("Database ready (embedded RocksDB)");
    Ok(db)
}

/// Schema 定义，可重复执行
///
/// orders.order_id 的唯一索引是序列签发之外的兜底约束。
pub async fn define_schema(db: &Surreal<Db>) -> anyhow::Result<()> {
    db.query("DEFINE INDEX IF NOT EXISTS uniq_order_id ON TABLE orders FIELDS order_id UNIQUE")
        .await
        .context("Failed to define orders.order_id index")?;
    db.query("DEFINE INDEX IF NOT EXISTS idx_stock_location ON TABLE stock FIELDS product, variant_id, size")
        .await
        .context("Failed to define stock location index")?;
    Ok(())
}
