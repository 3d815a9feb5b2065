pub mod csv;
pub mod xlsx;

pub use self::csv::to_csv_bytes;
pub use self::xlsx::{to_xlsx_bytes, SHEET_NAME};
