use serde::{Deserialize, Serialize};

use crate::models::Dataset;

/// 合并模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// 导入结果整体替换现有数据
    #[default]
    Replace,
    /// 追加，跳过与现有数据重复的记录
    #[serde(alias = "append_without_duplicate")]
    Append,
}

/// 合并结果
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub dataset: Dataset,
    pub added: usize,
    pub skipped: usize,
}

/// 导入统计 (返回给调用方)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub mode: MergeMode,
    pub imported: usize,
    pub added: usize,
    pub skipped: usize,
    pub total_rows: usize,
}
