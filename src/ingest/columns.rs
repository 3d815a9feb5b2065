use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::Field;

const TAX_ID_ALIASES: [&str; 4] = ["CNPJ", "CPF", "CNPJ/CPF", "CNPJ / CPF"];
const INVOICE_NUMBER_ALIASES: [&str; 8] = ["N°", "Nº", "NUMERO", "N° NF", "Nº NF", "NF", "N", "N."];

/// 多个源列映射到同一规范字段时的取舍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// 取最左边的列
    #[default]
    FirstWins,
    /// 取最右边的列
    LastWins,
}

/// 表头名称归类（按优先级取第一个命中的规则）
pub fn classify_header(label: &str) -> Option<Field> {
    let up = label.trim().to_uppercase();
    if up.contains("FORNECEDOR") {
        Some(Field::Supplier)
    } else if TAX_ID_ALIASES.contains(&up.as_str()) {
        Some(Field::TaxId)
    } else if INVOICE_NUMBER_ALIASES.contains(&up.as_str()) {
        Some(Field::InvoiceNumber)
    } else if up.contains("DATA") {
        Some(Field::IssueDate)
    } else if up.contains("VALOR") {
        Some(Field::Amount)
    } else {
        None
    }
}

/// 规范字段 -> 源列下标
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: IndexMap<Field, usize>,
}

impl ColumnMap {
    /// 根据表头建立映射，未识别的列丢弃
    pub fn from_headers<S: AsRef<str>>(headers: &[S], policy: CollisionPolicy) -> Self {
        let mut columns = IndexMap::new();
        for (idx, label) in headers.iter().enumerate() {
            let Some(field) = classify_header(label.as_ref()) else {
                continue;
            };
            match policy {
                CollisionPolicy::FirstWins => {
                    columns.entry(field).or_insert(idx);
                }
                CollisionPolicy::LastWins => {
                    columns.insert(field, idx);
                }
            }
        }
        Self { columns }
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// 源表中缺失的规范字段
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.columns.contains_key(f))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
