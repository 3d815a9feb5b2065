use csv::Writer;

use crate::error::{LedgerError, Result};
use crate::models::{Dataset, Field};

/// 导出数据集为 CSV（同列顺序和列名，日期 YYYY-MM-DD）
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(Field::ALL.map(Field::label))?;

    for record in dataset.records() {
        writer.write_record([
            record.supplier.clone(),
            record.tax_id.clone(),
            record.invoice_number.clone(),
            record
                .issue_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            record.amount.to_string(),
        ])?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| LedgerError::Io(e.into_error()))
}
