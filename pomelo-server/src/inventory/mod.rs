//! 库存台账模块
//!
//! - [`StockLocation`] - 按 size_type 解析出的统一库存位句柄
//! - [`InventoryLedger`] - 批量增减库存，逐项独立成败

pub mod ledger;
pub mod location;

pub use ledger::{AdjustmentOutcome, InventoryLedger, StockAdjustment};
pub use location::StockLocation;
