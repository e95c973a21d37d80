//! 集成测试公共设施
//!
//! - 内存引擎上的 ServerState
//! - 可编排行为的本地物流 API 假服务

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use pomelo_server::auth::JwtConfig;
use pomelo_server::core::{Config, ServerState};
use pomelo_server::db;
use pomelo_server::db::repository::stock::StockRow;
use pomelo_server::db::repository::{OrderRepository, ProductRepository, StockRepository};
use shared::models::{
    CartLine, Order, OrderStatus, OrderType, Product, ProductVariant, SizeEntry, SizeType,
};

pub fn test_config(logistics_url: &str) -> Config {
    Config {
        work_dir: "/tmp/pomelo-test".to_string(),
        http_port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-32-bytes!!!!".to_string(),
            issuer: "pomelo-identity".to_string(),
            audience: "pomelo-server".to_string(),
            expiration_minutes: 10,
        },
        logistics_api_url: logistics_url.to_string(),
        logistics_api_token: None,
        logistics_timeout_ms: 2_000,
        status_cache_ttl_secs: 60,
    }
}

/// 内存引擎数据库 (schema 已定义)
pub async fn mem_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("mem db");
    db.use_ns("test").use_db("test").await.expect("ns/db");
    db::define_schema(&db).await.expect("schema");
    db
}

pub async fn mem_state(logistics_url: &str) -> ServerState {
    ServerState::with_db(test_config(logistics_url), mem_db().await)
}

// ========== Seeding helpers ==========

/// individual 商品：单 variant，若干尺码同一初始库存
pub async fn seed_sized_product(
    db: &Surreal<Db>,
    product_id: &str,
    variant_id: &str,
    sizes: &[&str],
    availability: i64,
    sold_quantity: i64,
) {
    let products = ProductRepository::new(db.clone());
    let stock = StockRepository::new(db.clone());
    products
        .create(
            product_id,
            Product {
                size_type: SizeType::Individual,
                sold_quantity,
                variants: vec![ProductVariant {
                    variant_id: variant_id.to_string(),
                    buying_price: 100.0,
                    sizes: sizes
                        .iter()
                        .map(|s| SizeEntry {
                            size: s.to_string(),
                        })
                        .collect(),
                }],
            },
        )
        .await
        .expect("seed product");
    for size in sizes {
        stock
            .create(StockRow {
                product: product_id.to_string(),
                variant_id: variant_id.to_string(),
                size: Some(size.to_string()),
                availability,
            })
            .await
            .expect("seed stock");
    }
}

/// free/none 商品：单 variant 单库存位
pub async fn seed_unsized_product(
    db: &Surreal<Db>,
    product_id: &str,
    variant_id: &str,
    size_type: SizeType,
    availability: i64,
) {
    let products = ProductRepository::new(db.clone());
    let stock = StockRepository::new(db.clone());
    products
        .create(
            product_id,
            Product {
                size_type,
                sold_quantity: 0,
                variants: vec![ProductVariant {
                    variant_id: variant_id.to_string(),
                    buying_price: 100.0,
                    sizes: vec![],
                }],
            },
        )
        .await
        .expect("seed product");
    stock
        .create(StockRow {
            product: product_id.to_string(),
            variant_id: variant_id.to_string(),
            size: None,
            availability,
        })
        .await
        .expect("seed stock");
}

pub async fn seed_order(
    db: &Surreal<Db>,
    order_id: i64,
    status: OrderStatus,
    cart: Vec<CartLine>,
    consignment_id: Option<&str>,
) -> Order {
    let now = Utc::now();
    OrderRepository::new(db.clone())
        .create(Order {
            order_id,
            status,
            cart,
            consignment_id: consignment_id.map(|s| s.to_string()),
            total_revenue: None,
            order_type: OrderType::Web,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("seed order")
}

pub fn cart_line(product_id: &str, variant_id: &str, size: Option<&str>, quantity: i64) -> CartLine {
    CartLine {
        product_id: product_id.to_string(),
        variant_id: variant_id.to_string(),
        selected_size: size.map(|s| s.to_string()),
        quantity,
        price: 500.0,
    }
}

pub async fn sold_quantity(db: &Surreal<Db>, product_id: &str) -> i64 {
    ProductRepository::new(db.clone())
        .find_by_id(product_id)
        .await
        .expect("find product")
        .expect("product exists")
        .sold_quantity
}

pub async fn availability(
    db: &Surreal<Db>,
    product_id: &str,
    variant_id: &str,
    size: Option<&str>,
) -> i64 {
    StockRepository::new(db.clone())
        .find_by_product(product_id)
        .await
        .expect("stock rows")
        .into_iter()
        .find(|row| row.variant_id == variant_id && row.size.as_deref() == size)
        .expect("stock location exists")
        .availability
}

// ========== Mock logistics upstream ==========

/// 假物流服务行为
#[derive(Clone)]
pub enum MockMode {
    /// 托运单详情正常返回
    RevenueOk { order_amount: f64, total_fee: f64 },
    /// 托运单详情返回字符串金额 (不可解析为数值)
    RevenueMalformed,
    /// 两个端点都返回固定错误码
    AlwaysFail { status: u16, retry_after: Option<&'static str> },
    /// 第一次失败，之后成功 (状态查询端点)
    FailThenOk { status: u16, retry_after: Option<&'static str> },
}

pub struct MockLogistics {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl MockLogistics {
    /// 上游被实际调用的次数
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct MockState {
    mode: MockMode,
    hits: Arc<AtomicUsize>,
}

pub async fn spawn_mock_logistics(mode: MockMode) -> MockLogistics {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        mode,
        hits: hits.clone(),
    };

    let app = Router::new()
        .route("/consignments/{id}", get(consignment))
        .route("/order-status/{id}", get(order_status))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockLogistics {
        base_url: format!("http://{}", addr),
        hits,
    }
}

fn failure(status: u16, retry_after: Option<&'static str>) -> Response {
    let code = StatusCode::from_u16(status).unwrap();
    let mut response = (code, r#"{"error":"upstream unhappy"}"#.to_string()).into_response();
    if let Some(value) = retry_after {
        response
            .headers_mut()
            .insert(http::header::RETRY_AFTER, value.parse().unwrap());
    }
    response
}

async fn consignment(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match &state.mode {
        MockMode::RevenueOk {
            order_amount,
            total_fee,
        } => axum::Json(serde_json::json!({
            "consignment_id": id,
            "order_amount": order_amount,
            "total_fee": total_fee,
        }))
        .into_response(),
        MockMode::RevenueMalformed => axum::Json(serde_json::json!({
            "consignment_id": id,
            "order_amount": "1000",
            "total_fee": "50",
        }))
        .into_response(),
        MockMode::AlwaysFail {
            status,
            retry_after,
        }
        | MockMode::FailThenOk {
            status,
            retry_after,
        } => failure(*status, *retry_after),
    }
}

async fn order_status(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    match &state.mode {
        MockMode::AlwaysFail {
            status,
            retry_after,
        } => failure(*status, *retry_after),
        MockMode::FailThenOk {
            status,
            retry_after,
        } if hit == 0 => failure(*status, *retry_after),
        _ => axum::Json(serde_json::json!({
            "consignment_id": id,
            "order_status": "In Transit",
            "updated_at": Utc::now().to_rfc3339(),
        }))
        .into_response(),
    }
}
