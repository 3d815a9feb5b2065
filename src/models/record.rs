use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ingest::normalize::{clean_invoice_number, digits_only};

/// 规范字段（固定顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Supplier,
    TaxId,
    InvoiceNumber,
    IssueDate,
    Amount,
}

impl Field {
    /// 规范顺序：供应商、税号、发票号、开票日期、金额
    pub const ALL: [Field; 5] = [
        Field::Supplier,
        Field::TaxId,
        Field::InvoiceNumber,
        Field::IssueDate,
        Field::Amount,
    ];

    /// 表格列名（导出表头，可被列映射重新识别）
    pub fn label(self) -> &'static str {
        match self {
            Field::Supplier => "FORNECEDOR",
            Field::TaxId => "CNPJ",
            Field::InvoiceNumber => "NUMERO",
            Field::IssueDate => "DATA",
            Field::Amount => "VALOR",
        }
    }

    pub fn position(self) -> usize {
        match self {
            Field::Supplier => 0,
            Field::TaxId => 1,
            Field::InvoiceNumber => 2,
            Field::IssueDate => 3,
            Field::Amount => 4,
        }
    }
}

/// 应付发票记录 (NFS a pagar)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub supplier: String,
    pub tax_id: String,          // 仅数字 (CNPJ/CPF)
    pub invoice_number: String,
    pub issue_date: Option<NaiveDate>,
    pub amount: BigDecimal,
}

impl InvoiceRecord {
    pub fn new(
        supplier: impl Into<String>,
        tax_id: impl Into<String>,
        invoice_number: impl Into<String>,
        issue_date: Option<NaiveDate>,
        amount: BigDecimal,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            tax_id: tax_id.into(),
            invoice_number: invoice_number.into(),
            issue_date,
            amount,
        }
    }

    /// 对已类型化的字段重新执行规范化（幂等）
    pub fn normalized(&self) -> Self {
        Self {
            supplier: self.supplier.trim().to_string(),
            tax_id: digits_only(&self.tax_id),
            invoice_number: clean_invoice_number(&self.invoice_number),
            issue_date: self.issue_date,
            amount: self.amount.clone(),
        }
    }

    pub fn has_supplier(&self) -> bool {
        !self.supplier.trim().is_empty()
    }
}

/// 内存数据集：保序，位置即 0 起始的连续行号
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<InvoiceRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<InvoiceRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 应付总额
    pub fn total_amount(&self) -> BigDecimal {
        self.records
            .iter()
            .fold(BigDecimal::zero(), |acc, r| acc + &r.amount)
    }

    /// 带行号的行
    pub fn rows(&self) -> impl Iterator<Item = IndexedRow<'_>> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| IndexedRow { index, record })
    }

    pub fn snapshot(&self) -> DatasetSnapshot {
        DatasetSnapshot::from_rows(self.rows(), self.total_amount())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexedRow<'a> {
    pub index: usize,
    #[serde(flatten)]
    pub record: &'a InvoiceRecord,
}

/// 对外暴露的数据集快照：固定五列，行号连续
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSnapshot {
    pub columns: Vec<Field>,
    pub rows: Vec<SnapshotRow>,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub index: usize,
    #[serde(flatten)]
    pub record: InvoiceRecord,
}

impl DatasetSnapshot {
    pub fn from_rows<'a>(
        rows: impl Iterator<Item = IndexedRow<'a>>,
        total_amount: BigDecimal,
    ) -> Self {
        Self {
            columns: Field::ALL.to_vec(),
            rows: rows
                .map(|r| SnapshotRow {
                    index: r.index,
                    record: r.record.clone(),
                })
                .collect(),
            total_amount,
        }
    }
}
