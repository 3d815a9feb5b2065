use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::error::{LedgerError, Result};
use crate::ingest::normalize::parse_amount_text;
use crate::models::{Dataset, DatasetSnapshot, InvoiceRecord, RecordDraft};

/// 手工新增一行，供应商必填
pub fn add_record(dataset: &Dataset, draft: &RecordDraft) -> Result<Dataset> {
    let record = admit(draft, dataset.len())?;
    let mut records = dataset.records().to_vec();
    records.push(record);
    Ok(Dataset::from_records(records))
}

/// 保存编辑后的整张表：逐行重新规范化，任一行缺供应商则整体拒绝
pub fn save_edits(drafts: &[RecordDraft]) -> Result<Dataset> {
    let records = drafts
        .iter()
        .enumerate()
        .map(|(row, draft)| admit(draft, row))
        .collect::<Result<Vec<_>>>()?;
    Ok(Dataset::from_records(records))
}

/// 按行号删除，行号来自用户输入的文本
pub fn delete_record(dataset: &Dataset, raw_index: &str) -> Result<Dataset> {
    let index = usize::from_str(raw_index.trim())
        .map_err(|_| LedgerError::InvalidIndex(raw_index.to_string()))?;
    if index >= dataset.len() {
        return Err(LedgerError::IndexOutOfRange(index));
    }
    let mut records = dataset.records().to_vec();
    records.remove(index);
    Ok(Dataset::from_records(records))
}

/// 清空
pub fn reset() -> Dataset {
    Dataset::new()
}

fn admit(draft: &RecordDraft, row: usize) -> Result<InvoiceRecord> {
    let record = draft.to_raw_row().into_record();
    if !record.has_supplier() {
        return Err(LedgerError::MissingSupplier { row });
    }
    Ok(record)
}

/// 只读筛选条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewFilter {
    pub supplier: Option<String>,
    pub number: Option<String>,
    pub min_amount: Option<String>,
}

impl ViewFilter {
    pub fn is_empty(&self) -> bool {
        blank(&self.supplier) && blank(&self.number) && blank(&self.min_amount)
    }

    fn matches(&self, record: &InvoiceRecord, min_amount: Option<&BigDecimal>) -> bool {
        if let Some(needle) = self.supplier.as_deref().filter(|s| !s.trim().is_empty()) {
            if !contains_ignore_case(&record.supplier, needle) {
                return false;
            }
        }
        if let Some(needle) = self.number.as_deref().filter(|s| !s.trim().is_empty()) {
            if !contains_ignore_case(&record.invoice_number, needle) {
                return false;
            }
        }
        min_amount.map_or(true, |min| &record.amount >= min)
    }
}

/// 筛选视图，保留原行号；最小金额无法解析时忽略该条件
pub fn filter_view(dataset: &Dataset, filter: &ViewFilter) -> DatasetSnapshot {
    let min_amount = filter.min_amount.as_deref().and_then(parse_amount_text);
    let rows: Vec<_> = dataset
        .rows()
        .filter(|row| filter.matches(row.record, min_amount.as_ref()))
        .collect();
    let total = rows
        .iter()
        .fold(BigDecimal::from(0), |acc, row| acc + &row.record.amount);
    DatasetSnapshot::from_rows(rows.into_iter(), total)
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: serde_json::Value) -> RecordDraft {
        serde_json::from_value(value).unwrap()
    }

    fn dataset() -> Dataset {
        save_edits(&[
            draft(json!({"supplier": "Padaria Central", "invoice_number": "101", "amount": 50})),
            draft(json!({"supplier": "Gráfica Sul", "invoice_number": "202", "amount": "1.500,00"})),
            draft(json!({"supplier": "PADARIA NORTE", "invoice_number": "303", "amount": 900.5})),
        ])
        .unwrap()
    }

    #[test]
    fn add_requires_supplier() {
        let ds = dataset();
        let err = add_record(&ds, &draft(json!({"supplier": "  ", "amount": 10}))).unwrap_err();
        assert!(matches!(err, LedgerError::MissingSupplier { row: 3 }));

        let added = add_record(&ds, &draft(json!({"supplier": "Nova", "amount": "x"}))).unwrap();
        assert_eq!(added.len(), 4);
        assert_eq!(added.records()[3].amount, BigDecimal::from(0));
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn save_rejects_whole_batch() {
        let err = save_edits(&[
            draft(json!({"supplier": "A"})),
            draft(json!({"amount": 1})),
        ])
        .unwrap_err();
        assert!(matches!(err, LedgerError::MissingSupplier { row: 1 }));
    }

    #[test]
    fn delete_validates_index() {
        let ds = dataset();
        assert!(matches!(
            delete_record(&ds, "abc").unwrap_err(),
            LedgerError::InvalidIndex(_)
        ));
        assert!(matches!(
            delete_record(&ds, "-1").unwrap_err(),
            LedgerError::InvalidIndex(_)
        ));
        assert!(matches!(
            delete_record(&ds, "3").unwrap_err(),
            LedgerError::IndexOutOfRange(3)
        ));

        let after = delete_record(&ds, " 1 ").unwrap();
        let numbers: Vec<_> = after.rows().map(|r| (r.index, r.record.invoice_number.clone())).collect();
        assert_eq!(numbers, vec![(0, "101".to_string()), (1, "303".to_string())]);
    }

    #[test]
    fn reset_yields_empty_dataset() {
        assert!(reset().is_empty());
        assert_eq!(reset().snapshot().columns.len(), 5);
    }

    #[test]
    fn filter_keeps_dataset_indexes() {
        let ds = dataset();
        let view = filter_view(
            &ds,
            &ViewFilter {
                supplier: Some("padaria".into()),
                ..ViewFilter::default()
            },
        );
        let idx: Vec<_> = view.rows.iter().map(|r| r.index).collect();
        assert_eq!(idx, vec![0, 2]);

        let view = filter_view(
            &ds,
            &ViewFilter {
                min_amount: Some("1.000,00".into()),
                ..ViewFilter::default()
            },
        );
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].index, 1);
        assert_eq!(view.total_amount, BigDecimal::from(1500));
    }
}
