pub mod raw;
pub mod record;
pub mod result;

pub use raw::{ParsedRow, RawRow, RecordDraft};
pub use record::{Dataset, DatasetSnapshot, Field, IndexedRow, InvoiceRecord, SnapshotRow};
pub use result::{ImportSummary, MergeMode, MergeOutcome};
