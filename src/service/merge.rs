use std::collections::HashSet;

use crate::config::MergeConfig;
use crate::models::{Dataset, InvoiceRecord, MergeMode, MergeOutcome};
use crate::service::dedup::dedup_key;

/// 将导入记录合并到现有数据集，返回新数据集（不修改入参）
pub fn merge(
    existing: &Dataset,
    incoming: Vec<InvoiceRecord>,
    mode: MergeMode,
    config: &MergeConfig,
) -> MergeOutcome {
    match mode {
        MergeMode::Replace => {
            let added = incoming.len();
            MergeOutcome {
                dataset: Dataset::from_records(incoming),
                added,
                skipped: 0,
            }
        }
        MergeMode::Append => append_without_duplicates(existing, incoming, config),
    }
}

/// 追加模式：键已存在于现有数据中的记录被跳过
///
/// 默认只和现有数据比较，同一批导入内部的重复会全部保留；
/// 打开 `dedup_within_batch` 后批内重复也会被跳过。
fn append_without_duplicates(
    existing: &Dataset,
    incoming: Vec<InvoiceRecord>,
    config: &MergeConfig,
) -> MergeOutcome {
    let mut seen: HashSet<String> = existing.records().iter().map(dedup_key).collect();
    let total = incoming.len();

    let mut records = existing.records().to_vec();
    for record in incoming {
        let key = dedup_key(&record);
        if seen.contains(&key) {
            continue;
        }
        if config.dedup_within_batch {
            seen.insert(key);
        }
        records.push(record);
    }

    let added = records.len() - existing.len();
    MergeOutcome {
        dataset: Dataset::from_records(records),
        added,
        skipped: total - added,
    }
}
