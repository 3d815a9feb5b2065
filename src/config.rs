use serde::{Deserialize, Serialize};

use crate::ingest::CollisionPolicy;

/// 配置文件名（可选，不带扩展名）
const CONFIG_FILE: &str = "nfs-ledger";
/// 环境变量前缀，例如 NFS__SERVER__PORT
const ENV_PREFIX: &str = "NFS";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ingest: IngestConfig,
    pub merge: MergeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 上传工作簿的最大字节数
    pub max_upload_bytes: usize,
}

/// 导入流水线参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// 表头扫描的行数
    pub header_scan_rows: usize,
    /// 找不到表头时使用的行（不同来源版本分别用 0 和 1）
    pub header_fallback_row: usize,
    pub column_collision: CollisionPolicy,
}

/// 合并参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// 追加模式下是否也在同一批导入内部去重
    pub dedup_within_batch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: 10,
            header_fallback_row: 0,
            column_collision: CollisionPolicy::FirstWins,
        }
    }
}

impl AppConfig {
    /// 加载配置：默认值 -> nfs-ledger.toml (可选) -> NFS__* 环境变量
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
