//! tally-ingest: statement table loading, amount cleaning, column role
//! inference, and staging into unified ledger columns.

pub mod amount;
pub mod columns;
pub mod dates;
pub mod error;
pub mod normalize;
pub mod table;

pub use amount::{amount_or_zero, clean_amount_text, parse_amount};
pub use columns::{infer_roles, ColumnRef, ColumnRoleMap, MatchKind, Role, RoleMatch};
pub use dates::{default_date_formats, parse_date, DEFAULT_DATE_FORMATS};
pub use error::{IngestError, Result};
pub use normalize::{normalize_table, AmountCell, DateCell, StagedRow, StagedTable};
pub use table::RawTable;
