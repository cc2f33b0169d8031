//! tally-core: canonical ledger types shared by ingest, finance and the CLI

pub mod ledger;
pub mod month;
pub mod transaction;

pub use ledger::{CategorySpend, DailyFlow, FlowKind, Ledger, Metrics, DEFAULT_PRIORITY_PHRASE};
pub use month::{ParseYearMonthError, YearMonth};
pub use transaction::{Transaction, OTHER_CATEGORY};
