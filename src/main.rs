use nfs_ledger::{api, AppConfig, LedgerService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 内存账本（会话状态），启动时为空
    let service = Arc::new(LedgerService::new(config.ingest.clone(), config.merge.clone()));

    let app = api::router(service, config.server.max_upload_bytes);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET    /api/records          - 当前数据集 (supplier/number/min_amount 筛选)");
    info!("  POST   /api/records          - 新增一行");
    info!("  PUT    /api/records          - 保存编辑");
    info!("  DELETE /api/records[/:index] - 清空 / 删除一行");
    info!("  POST   /api/import?mode=     - 导入 Excel (replace | append)");
    info!("  GET    /api/export[.csv]     - 导出 NFS A PAGAR");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
