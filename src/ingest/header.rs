use calamine::Data;

use crate::config::IngestConfig;
use crate::ingest::normalize::cell_text;

const SUPPLIER_KEYWORD: &str = "FORNECEDOR";
const AMOUNT_KEYWORD: &str = "VALOR";

/// 在前若干行中定位表头行
///
/// 第一行同时含有 "FORNECEDOR" 和 "VALOR" 单元格（子串、忽略大小写）即为表头；
/// 找不到时退回 `header_fallback_row`。
pub fn detect_header_row(rows: &[Vec<Data>], config: &IngestConfig) -> usize {
    let window = rows.len().min(config.header_scan_rows);
    rows[..window]
        .iter()
        .position(|row| is_header_row(row))
        .unwrap_or(config.header_fallback_row)
}

fn is_header_row(row: &[Data]) -> bool {
    let upper: Vec<String> = row.iter().map(|c| cell_text(c).to_uppercase()).collect();
    upper.iter().any(|c| c.contains(SUPPLIER_KEYWORD)) && upper.iter().any(|c| c.contains(AMOUNT_KEYWORD))
}
