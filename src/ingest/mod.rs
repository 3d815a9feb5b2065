//! 导入流水线：表头定位 -> 列映射 -> 页脚过滤 -> 字段规范化

pub mod columns;
pub mod footer;
pub mod header;
pub mod normalize;

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::config::IngestConfig;
use crate::error::{LedgerError, Result};
use crate::models::{Field, InvoiceRecord, RawRow};

pub use columns::{classify_header, CollisionPolicy, ColumnMap};
pub use footer::is_footer_row;
pub use header::detect_header_row;

/// 读取工作簿字节（只取第一个工作表）并转换为规范记录
pub fn ingest_workbook(bytes: &[u8], config: &IngestConfig) -> Result<Vec<InvoiceRecord>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LedgerError::NoWorksheet)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

    tracing::info!("读取工作表 '{}': {} 行", sheet_name, rows.len());
    Ok(ingest_rows(&rows, config))
}

/// 对原始二维表执行导入流水线
pub fn ingest_rows(rows: &[Vec<Data>], config: &IngestConfig) -> Vec<InvoiceRecord> {
    let header_idx = detect_header_row(rows, config);
    let Some(header) = rows.get(header_idx) else {
        tracing::warn!("Header row {} out of range ({} rows), nothing to import", header_idx, rows.len());
        return Vec::new();
    };

    let labels: Vec<String> = header.iter().map(normalize::cell_text).collect();
    let map = ColumnMap::from_headers(&labels, config.column_collision);
    if map.is_empty() {
        tracing::warn!("表头行 {} 没有可识别的列: {:?}", header_idx, labels);
    } else if !map.missing().is_empty() {
        tracing::debug!("表头行 {}: 缺失列 {:?}", header_idx, map.missing());
    }

    let mut records = Vec::with_capacity(rows.len().saturating_sub(header_idx + 1));
    let mut footers = 0usize;
    let mut blanks = 0usize;

    for row in &rows[header_idx + 1..] {
        let raw = map_row(row, &map);
        if raw.is_blank() {
            blanks += 1;
            continue;
        }
        if is_footer_row(&raw) {
            footers += 1;
            continue;
        }
        records.push(raw.into_record());
    }

    tracing::info!(
        "导入完成: 表头行 {}, 记录 {}, 跳过合计行 {}, 空行 {}",
        header_idx, records.len(), footers, blanks
    );
    records
}

/// 按列映射取出五个规范字段的原始单元格，缺失列补空
fn map_row(row: &[Data], map: &ColumnMap) -> RawRow {
    RawRow::new(Field::ALL.map(|field| {
        map.column(field)
            .and_then(|col| row.get(col))
            .cloned()
            .unwrap_or(Data::Empty)
    }))
}
