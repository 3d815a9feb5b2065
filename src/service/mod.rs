pub mod dedup;
pub mod edit;
pub mod ledger;
pub mod merge;

pub use dedup::dedup_key;
pub use edit::ViewFilter;
pub use ledger::LedgerService;
pub use merge::merge;
