use bigdecimal::{BigDecimal, Zero};
use calamine::Data;
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::normalize::{
    is_absent, normalize_invoice_number, normalize_supplier, normalize_tax_id, parse_amount,
    parse_issue_date,
};
use crate::models::{Field, InvoiceRecord};

/// 映射后的原始行：五个规范字段对应的原始单元格，尚未规范化
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    cells: [Data; 5],
}

impl RawRow {
    pub fn new(cells: [Data; 5]) -> Self {
        Self { cells }
    }

    pub fn cell(&self, field: Field) -> &Data {
        &self.cells[field.position()]
    }

    pub fn is_absent(&self, field: Field) -> bool {
        is_absent(self.cell(field))
    }

    /// 五个字段全部缺失
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.is_absent(*f))
    }

    /// 规范化为记录，金额缺失时才在此处落为 0
    pub fn into_record(self) -> InvoiceRecord {
        let parsed = self.parse();
        InvoiceRecord {
            supplier: parsed.supplier,
            tax_id: parsed.tax_id,
            invoice_number: parsed.invoice_number,
            issue_date: parsed.issue_date,
            amount: parsed.amount.unwrap_or_else(BigDecimal::zero),
        }
    }

    /// 逐字段解析，保留金额的缺失状态
    pub fn parse(&self) -> ParsedRow {
        ParsedRow {
            supplier: normalize_supplier(self.cell(Field::Supplier)),
            tax_id: normalize_tax_id(self.cell(Field::TaxId)),
            invoice_number: normalize_invoice_number(self.cell(Field::InvoiceNumber)),
            issue_date: parse_issue_date(self.cell(Field::IssueDate)),
            amount: parse_amount(self.cell(Field::Amount)),
        }
    }
}

/// 解析后的行，金额仍可能缺失
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub supplier: String,
    pub tax_id: String,
    pub invoice_number: String,
    pub issue_date: Option<chrono::NaiveDate>,
    pub amount: Option<BigDecimal>,
}

/// 手工录入/编辑的行（JSON），各字段类型宽松
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordDraft {
    #[serde(default)]
    pub supplier: Value,
    #[serde(default)]
    pub tax_id: Value,
    #[serde(default)]
    pub invoice_number: Value,
    #[serde(default)]
    pub issue_date: Value,
    #[serde(default)]
    pub amount: Value,
}

impl RecordDraft {
    /// 转为原始行，与导入走同一套规范化
    pub fn to_raw_row(&self) -> RawRow {
        RawRow::new([
            json_to_cell(&self.supplier),
            json_to_cell(&self.tax_id),
            json_to_cell(&self.invoice_number),
            json_to_cell(&self.issue_date),
            json_to_cell(&self.amount),
        ])
    }
}

fn json_to_cell(value: &Value) -> Data {
    match value {
        Value::Null => Data::Empty,
        Value::Bool(b) => Data::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Data::Int(i),
            None => n.as_f64().map(Data::Float).unwrap_or(Data::Empty),
        },
        Value::String(s) => Data::String(s.clone()),
        other => Data::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn draft_goes_through_normalizers() {
        let draft: RecordDraft = serde_json::from_value(json!({
            "supplier": "  Padaria Central ",
            "tax_id": "12.345.678/0001-95",
            "invoice_number": 4512,
            "issue_date": "15/03/2024",
            "amount": "1.234,56"
        }))
        .unwrap();

        let record = draft.to_raw_row().into_record();
        assert_eq!(record.supplier, "Padaria Central");
        assert_eq!(record.tax_id, "12345678000195");
        assert_eq!(record.invoice_number, "4512");
        assert_eq!(record.issue_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(record.amount, BigDecimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn missing_draft_fields_become_defaults() {
        let draft: RecordDraft = serde_json::from_value(json!({ "supplier": "X" })).unwrap();
        let raw = draft.to_raw_row();
        assert!(raw.is_absent(Field::Amount));
        assert_eq!(raw.parse().amount, None);

        let record = raw.into_record();
        assert_eq!(record.tax_id, "");
        assert_eq!(record.issue_date, None);
        assert_eq!(record.amount, BigDecimal::zero());
    }
}
