use tokio::sync::Mutex;

use crate::config::{IngestConfig, MergeConfig};
use crate::error::Result;
use crate::export;
use crate::ingest::ingest_workbook;
use crate::models::{Dataset, DatasetSnapshot, ImportSummary, MergeMode, RecordDraft};
use crate::service::edit::{self, ViewFilter};
use crate::service::merge::merge;

/// 账本服务：持有唯一的内存数据集
///
/// 每个操作在锁内读取当前数据集，调用纯函数得到新数据集，成功后才替换；
/// 失败时数据集保持不变。
pub struct LedgerService {
    dataset: Mutex<Dataset>,
    ingest: IngestConfig,
    merge: MergeConfig,
}

impl LedgerService {
    pub fn new(ingest: IngestConfig, merge: MergeConfig) -> Self {
        Self::with_dataset(Dataset::new(), ingest, merge)
    }

    pub fn with_dataset(dataset: Dataset, ingest: IngestConfig, merge: MergeConfig) -> Self {
        Self {
            dataset: Mutex::new(dataset),
            ingest,
            merge,
        }
    }

    pub async fn snapshot(&self, filter: &ViewFilter) -> DatasetSnapshot {
        let dataset = self.dataset.lock().await;
        if filter.is_empty() {
            dataset.snapshot()
        } else {
            edit::filter_view(&dataset, filter)
        }
    }

    /// 导入工作簿并按模式合并
    pub async fn import(&self, bytes: &[u8], mode: MergeMode) -> Result<ImportSummary> {
        let mut dataset = self.dataset.lock().await;

        let incoming = ingest_workbook(bytes, &self.ingest).map_err(|e| {
            tracing::error!("Import failed: {}", e);
            e
        })?;
        let imported = incoming.len();

        let outcome = merge(&dataset, incoming, mode, &self.merge);
        *dataset = outcome.dataset;

        tracing::info!(
            "导入合并完成 ({:?}): 新增 {}, 跳过重复 {}, 当前 {} 行",
            mode, outcome.added, outcome.skipped, dataset.len()
        );

        Ok(ImportSummary {
            mode,
            imported,
            added: outcome.added,
            skipped: outcome.skipped,
            total_rows: dataset.len(),
        })
    }

    pub async fn add(&self, draft: &RecordDraft) -> Result<DatasetSnapshot> {
        self.apply(|current| edit::add_record(current, draft)).await
    }

    pub async fn save(&self, drafts: &[RecordDraft]) -> Result<DatasetSnapshot> {
        self.apply(|_| edit::save_edits(drafts)).await
    }

    pub async fn delete(&self, raw_index: &str) -> Result<DatasetSnapshot> {
        self.apply(|current| edit::delete_record(current, raw_index)).await
    }

    pub async fn reset(&self) -> DatasetSnapshot {
        let mut dataset = self.dataset.lock().await;
        *dataset = edit::reset();
        tracing::info!("Dataset reset");
        dataset.snapshot()
    }

    pub async fn export_xlsx(&self) -> Result<Vec<u8>> {
        let dataset = self.dataset.lock().await;
        export::to_xlsx_bytes(&dataset)
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let dataset = self.dataset.lock().await;
        export::to_csv_bytes(&dataset)
    }

    async fn apply<F>(&self, op: F) -> Result<DatasetSnapshot>
    where
        F: FnOnce(&Dataset) -> Result<Dataset>,
    {
        let mut dataset = self.dataset.lock().await;
        match op(&*dataset) {
            Ok(next) => {
                *dataset = next;
                tracing::info!("Dataset updated: {} rows", dataset.len());
                Ok(dataset.snapshot())
            }
            Err(e) => {
                tracing::warn!("Edit rejected: {}", e);
                Err(e)
            }
        }
    }
}
