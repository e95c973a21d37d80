//! 订单生命周期模块
//!
//! - [`StatusTransitionEngine`] - 状态机：delivered 边界计数 + 收入结算 + 持久化
//! - [`OrderDeletionWorkflow`] - 删除订单并按需回补库存

pub mod deletion;
pub mod transition;

pub use deletion::OrderDeletionWorkflow;
pub use transition::{StatusTransitionEngine, TransitionOutcome};
