use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C，返回后由 main 结束服务
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping server...");
}
