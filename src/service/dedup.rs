use bigdecimal::BigDecimal;

use crate::models::InvoiceRecord;

/// 去重键
///
/// 有税号时: `税号|发票号|日期`；
/// 无税号时: `大写供应商|发票号|日期|两位小数金额`，金额用于区分不同供应商的同号发票。
pub fn dedup_key(record: &InvoiceRecord) -> String {
    let date = record
        .issue_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    if !record.tax_id.is_empty() {
        format!("{}|{}|{}", record.tax_id, record.invoice_number, date)
    } else {
        format!(
            "{}|{}|{}|{}",
            record.supplier.trim().to_uppercase(),
            record.invoice_number,
            date,
            amount_key(&record.amount)
        )
    }
}

fn amount_key(amount: &BigDecimal) -> String {
    amount.round(2).with_scale(2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn record(supplier: &str, tax_id: &str, amount: &str) -> InvoiceRecord {
        InvoiceRecord::new(
            supplier,
            tax_id,
            "123",
            NaiveDate::from_ymd_opt(2024, 3, 15),
            BigDecimal::from_str(amount).unwrap(),
        )
    }

    #[test]
    fn tax_id_key_ignores_supplier_and_amount() {
        let a = record("ACME LTDA", "12345678000195", "10.00");
        let b = record("Acme Ltda.", "12345678000195", "99.00");
        assert_eq!(dedup_key(&a), dedup_key(&b));
        assert_eq!(dedup_key(&a), "12345678000195|123|2024-03-15");
    }

    #[test]
    fn supplier_key_includes_amount() {
        let a = record(" acme ", "", "10.00");
        let b = record("ACME", "", "10.01");
        assert_ne!(dedup_key(&a), dedup_key(&b));
        assert_eq!(dedup_key(&a), "ACME|123|2024-03-15|10.00");
    }

    #[test]
    fn amount_is_rounded_to_cents() {
        let a = record("ACME", "", "10");
        let b = record("ACME", "", "10.001");
        assert_eq!(dedup_key(&a), dedup_key(&b));
    }

    #[test]
    fn missing_date_is_empty_segment() {
        let mut r = record("ACME", "", "1");
        r.issue_date = None;
        assert_eq!(dedup_key(&r), "ACME|123||1.00");
    }
}
