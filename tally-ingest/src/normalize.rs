//! Ledger normalizer: raw table + role map → staged rows with unified
//! date/description/amount/category slots.
//!
//! Staging is pure: the raw table is only read. Amounts from the dual
//! (credit − debit) layout are already numeric here; single-column amounts
//! stay as text until the pipeline's final pass cleans them.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::amount::amount_or_zero;
use crate::columns::{ColumnRoleMap, Role};
use crate::table::RawTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DateCell {
    Parsed(NaiveDate),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AmountCell {
    /// Already signed: credit minus debit, or a canonical amount
    Netted(f64),
    /// Single-column text, cleaned later
    Raw(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedRow {
    /// 1-based data row number in the source (header excluded)
    pub line: usize,
    pub date: DateCell,
    pub description: Option<String>,
    pub amount: AmountCell,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StagedTable {
    pub rows: Vec<StagedRow>,
    /// The source carried its own category column
    pub has_category_column: bool,
}

/// Stage every row of `table` according to `roles`.
pub fn normalize_table(table: &RawTable, roles: &ColumnRoleMap) -> StagedTable {
    let date_col = roles.get(Role::Date).map(|c| c.index);
    let desc_col = roles.get(Role::Description).map(|c| c.index);
    let category_col = roles.get(Role::Category).map(|c| c.index);

    let dual = roles
        .get(Role::Credit)
        .zip(roles.get(Role::Debit))
        .map(|(credit, debit)| (credit.index, debit.index));
    let single_col = roles.single_amount_column().map(|c| c.index);

    let cell = |row: usize, col: Option<usize>| col.and_then(|c| table.cell(row, c));

    let rows = (0..table.row_count())
        .map(|row| {
            let amount = match dual {
                Some((credit, debit)) => AmountCell::Netted(
                    amount_or_zero(table.cell(row, credit)) - amount_or_zero(table.cell(row, debit)),
                ),
                None => match cell(row, single_col) {
                    Some(text) => AmountCell::Raw(text.to_string()),
                    None => AmountCell::Missing,
                },
            };

            StagedRow {
                line: row + 1,
                date: DateCell::Raw(cell(row, date_col).unwrap_or_default().to_string()),
                description: cell(row, desc_col).map(str::to_string),
                amount,
                category: cell(row, category_col).map(str::to_string),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        rows = rows.len(),
        dual_amount = dual.is_some(),
        "staged statement rows"
    );

    StagedTable {
        rows,
        has_category_column: category_col.is_some(),
    }
}
