//! 状态机与删除工作流集成测试
//!
//! 内存引擎 + 本地假物流服务，覆盖 delivered 边界计数、
//! 收入结算顺序与删除回补。

mod common;

use common::*;
use pomelo_server::db::repository::OrderRepository;
use pomelo_server::orders::{OrderDeletionWorkflow, StatusTransitionEngine};
use pomelo_server::utils::AppError;
use shared::models::{OrderStatus, SizeType};

fn engine(state: &pomelo_server::ServerState) -> StatusTransitionEngine {
    StatusTransitionEngine::new(state.db.clone(), state.logistics.clone())
}

#[tokio::test]
async fn delivered_boundary_adjusts_sold_quantity_both_ways() {
    let state = mem_state("http://localhost:1").await;
    seed_sized_product(&state.db, "P1", "V1", &["M"], 5, 0).await;
    seed_order(
        &state.db,
        1,
        OrderStatus::Pending,
        vec![cart_line("P1", "V1", Some("M"), 2)],
        None,
    )
    .await;

    // pending -> delivered：计数 +2，可用库存不动，无托运单号不结算收入
    let outcome = engine(&state).transition(1, OrderStatus::Delivered).await.unwrap();
    assert_eq!(outcome.revenue, None);
    assert_eq!(sold_quantity(&state.db, "P1").await, 2);
    assert_eq!(availability(&state.db, "P1", "V1", Some("M")).await, 5);

    // delivered -> cancelled：等量回退
    engine(&state).transition(1, OrderStatus::Cancelled).await.unwrap();
    assert_eq!(sold_quantity(&state.db, "P1").await, 0);

    let order = OrderRepository::new(state.db.clone())
        .find_by_order_id(1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn same_status_transition_does_not_touch_counters() {
    let state = mem_state("http://localhost:1").await;
    seed_sized_product(&state.db, "P1", "V1", &["M"], 5, 7).await;
    seed_order(
        &state.db,
        1,
        OrderStatus::Delivered,
        vec![cart_line("P1", "V1", Some("M"), 3)],
        None,
    )
    .await;

    // delivered -> delivered 不属于任何一侧边界
    engine(&state).transition(1, OrderStatus::Delivered).await.unwrap();
    assert_eq!(sold_quantity(&state.db, "P1").await, 7);

    // 不经过 delivered 的流转同样不动计数
    seed_order(
        &state.db,
        2,
        OrderStatus::Shipped,
        vec![cart_line("P1", "V1", Some("M"), 3)],
        None,
    )
    .await;
    engine(&state).transition(2, OrderStatus::Refund).await.unwrap();
    engine(&state).transition(2, OrderStatus::Cancelled).await.unwrap();
    assert_eq!(sold_quantity(&state.db, "P1").await, 7);
}

#[tokio::test]
async fn revenue_is_resolved_and_persisted_with_delivered_status() {
    let mock = spawn_mock_logistics(MockMode::RevenueOk {
        order_amount: 1000.0,
        total_fee: 50.0,
    })
    .await;
    let state = mem_state(&mock.base_url).await;
    seed_sized_product(&state.db, "P1", "V1", &["M"], 5, 0).await;
    seed_order(
        &state.db,
        2,
        OrderStatus::Shipped,
        vec![cart_line("P1", "V1", Some("M"), 1)],
        Some("C-1"),
    )
    .await;

    let outcome = engine(&state).transition(2, OrderStatus::Delivered).await.unwrap();
    assert_eq!(outcome.revenue, Some(950.0));

    let order = OrderRepository::new(state.db.clone())
        .find_by_order_id(2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.total_revenue, Some(950.0));
    assert_eq!(sold_quantity(&state.db, "P1").await, 1);
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn upstream_failure_aborts_the_whole_transition() {
    let mock = spawn_mock_logistics(MockMode::AlwaysFail {
        status: 500,
        retry_after: None,
    })
    .await;
    let state = mem_state(&mock.base_url).await;
    seed_sized_product(&state.db, "P1", "V1", &["M"], 5, 0).await;
    seed_order(
        &state.db,
        2,
        OrderStatus::Shipped,
        vec![cart_line("P1", "V1", Some("M"), 1)],
        Some("C-1"),
    )
    .await;

    let err = engine(&state)
        .transition(2, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));

    // 订单与计数都保持原样
    let order = OrderRepository::new(state.db.clone())
        .find_by_order_id(2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.total_revenue, None);
    assert_eq!(sold_quantity(&state.db, "P1").await, 0);
    // 收入结算只调用一次，不重试
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn malformed_revenue_payload_is_an_upstream_error() {
    let mock = spawn_mock_logistics(MockMode::RevenueMalformed).await;
    let state = mem_state(&mock.base_url).await;
    seed_sized_product(&state.db, "P1", "V1", &["M"], 5, 0).await;
    seed_order(
        &state.db,
        3,
        OrderStatus::Shipped,
        vec![cart_line("P1", "V1", Some("M"), 1)],
        Some("C-9"),
    )
    .await;

    let err = engine(&state)
        .transition(3, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
}

#[tokio::test]
async fn transition_of_unknown_order_is_not_found() {
    let state = mem_state("http://localhost:1").await;
    let err = engine(&state)
        .transition(404, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_cancelled_order_restocks_every_cart_line() {
    let state = mem_state("http://localhost:1").await;
    seed_sized_product(&state.db, "P1", "V1", &["M", "L"], 5, 0).await;
    seed_unsized_product(&state.db, "P2", "V9", SizeType::Free, 3).await;
    seed_order(
        &state.db,
        10,
        OrderStatus::Cancelled,
        vec![
            cart_line("P1", "V1", Some("M"), 2),
            cart_line("P2", "V9", None, 4),
        ],
        None,
    )
    .await;

    OrderDeletionWorkflow::new(state.db.clone())
        .delete(10)
        .await
        .unwrap();

    assert_eq!(availability(&state.db, "P1", "V1", Some("M")).await, 7);
    assert_eq!(availability(&state.db, "P1", "V1", Some("L")).await, 5);
    assert_eq!(availability(&state.db, "P2", "V9", None).await, 7);
    assert!(
        OrderRepository::new(state.db.clone())
            .find_by_order_id(10)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn deleting_a_returned_order_skips_restock() {
    let state = mem_state("http://localhost:1").await;
    seed_sized_product(&state.db, "P1", "V1", &["M"], 5, 0).await;
    seed_order(
        &state.db,
        11,
        OrderStatus::Returned,
        vec![cart_line("P1", "V1", Some("M"), 2)],
        None,
    )
    .await;

    OrderDeletionWorkflow::new(state.db.clone())
        .delete(11)
        .await
        .unwrap();

    assert_eq!(availability(&state.db, "P1", "V1", Some("M")).await, 5);
}

#[tokio::test]
async fn deleting_an_unknown_order_is_not_found() {
    let state = mem_state("http://localhost:1").await;
    let err = OrderDeletionWorkflow::new(state.db.clone())
        .delete(12345)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn order_ids_come_from_an_atomic_sequence() {
    let state = mem_state("http://localhost:1").await;
    let repo = OrderRepository::new(state.db.clone());

    let first = repo.next_order_id().await.unwrap();
    let second = repo.next_order_id().await.unwrap();
    assert_eq!(second, first + 1);
}
