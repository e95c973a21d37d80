use pomelo_server::{Config, Server, init_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("🍊 Pomelo Server starting...");

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 启动 HTTP 服务器
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
