//! Ledger pipeline: pick a source, then infer roles → stage → categorize →
//! finalize into the canonical ledger.
//!
//! Bad input never fails the pipeline. Unparseable amounts become 0, missing
//! roles fall back or go empty, and rows with unreadable dates are rejected
//! one by one and reported next to the ledger.

use std::path::PathBuf;

use serde::Serialize;
use tally_core::{Ledger, Transaction, OTHER_CATEGORY};
use tally_ingest::{
    amount_or_zero, default_date_formats, infer_roles, normalize_table, parse_date, AmountCell,
    DateCell, RawTable, StagedRow, StagedTable,
};
use tracing::{debug, info, warn};

use crate::category_rules::categorize_table;
use crate::sample::sample_ledger;

pub const DEFAULT_STATEMENT: &str = "statement.csv";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Local statement read when nothing is uploaded; `None` disables the lookup
    pub default_statement: Option<PathBuf>,
    pub delimiter: u8,
    pub date_formats: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            default_statement: Some(PathBuf::from(DEFAULT_STATEMENT)),
            delimiter: b',',
            date_formats: default_date_formats(),
        }
    }
}

/// Where the ledger came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LedgerSource {
    Upload,
    DefaultFile(PathBuf),
    Sample,
}

/// A source row dropped because its date could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub line: usize,
    pub date_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub source: LedgerSource,
    pub ledger: Ledger,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Clone, Default)]
pub struct LedgerPipeline {
    options: PipelineOptions,
}

impl LedgerPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Produce the canonical ledger from an uploaded table, the default local
    /// statement, or the built-in sample, in that order of preference.
    pub fn run(&self, upload: Option<RawTable>) -> PipelineOutput {
        let (source, table) = match upload.filter(is_usable) {
            Some(table) => (LedgerSource::Upload, table),
            None => match self.load_default() {
                Some((path, table)) => (LedgerSource::DefaultFile(path), table),
                None => {
                    info!("no statement available, using sample data");
                    return PipelineOutput {
                        source: LedgerSource::Sample,
                        ledger: sample_ledger(),
                        rejected: Vec::new(),
                    };
                }
            },
        };

        info!(source = ?source, rows = table.row_count(), "normalizing statement");
        let (ledger, rejected) = self.process_table(&table);
        PipelineOutput {
            source,
            ledger,
            rejected,
        }
    }

    /// Roles → staging → categories → final pass for one table.
    pub fn process_table(&self, table: &RawTable) -> (Ledger, Vec<RejectedRow>) {
        let roles = infer_roles(table.headers());
        let staged = categorize_table(normalize_table(table, &roles));
        finalize(staged, &self.options.date_formats)
    }

    fn load_default(&self) -> Option<(PathBuf, RawTable)> {
        let path = self.options.default_statement.as_ref()?;
        match RawTable::from_path(path, self.options.delimiter) {
            Ok(table) if is_usable(&table) => Some((path.clone(), table)),
            Ok(_) => {
                warn!(path = %path.display(), "default statement has no columns");
                None
            }
            Err(err) if err.is_not_found() => {
                debug!(path = %path.display(), "no default statement");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read default statement");
                None
            }
        }
    }
}

fn is_usable(table: &RawTable) -> bool {
    table.column_count() > 0
}

/// Final normalization: typed dates, numeric amounts, filled text fields.
///
/// Idempotent: feeding a ledger back through [`stage_ledger`] and this
/// function yields the same ledger.
pub fn finalize<S: AsRef<str>>(
    staged: StagedTable,
    date_formats: &[S],
) -> (Ledger, Vec<RejectedRow>) {
    let mut transactions = Vec::with_capacity(staged.rows.len());
    let mut rejected = Vec::new();

    for row in staged.rows {
        let date = match row.date {
            DateCell::Parsed(date) => date,
            DateCell::Raw(text) => match parse_date(&text, date_formats) {
                Some(date) => date,
                None => {
                    warn!(line = row.line, date = %text, "skipping row with unreadable date");
                    rejected.push(RejectedRow {
                        line: row.line,
                        date_text: text,
                    });
                    continue;
                }
            },
        };

        let amount = match row.amount {
            AmountCell::Netted(value) => value,
            AmountCell::Raw(text) => amount_or_zero(Some(text.as_str())),
            AmountCell::Missing => 0.0,
        };

        transactions.push(Transaction {
            date,
            description: row.description.unwrap_or_default(),
            amount,
            category: row
                .category
                .unwrap_or_else(|| OTHER_CATEGORY.to_string()),
        });
    }

    (Ledger::new(transactions), rejected)
}

/// Turn a canonical ledger back into staged rows.
pub fn stage_ledger(ledger: &Ledger) -> StagedTable {
    StagedTable {
        rows: ledger
            .iter()
            .enumerate()
            .map(|(i, t)| StagedRow {
                line: i + 1,
                date: DateCell::Parsed(t.date),
                description: Some(t.description.clone()),
                amount: AmountCell::Netted(t.amount),
                category: Some(t.category.clone()),
            })
            .collect(),
        has_category_column: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(csv: &str) -> RawTable {
        RawTable::from_reader(csv.as_bytes(), b',').unwrap()
    }

    fn no_default() -> LedgerPipeline {
        LedgerPipeline::new(PipelineOptions {
            default_statement: None,
            ..PipelineOptions::default()
        })
    }

    #[test]
    fn test_sample_fallback() {
        let out = no_default().run(None);
        assert_eq!(out.source, LedgerSource::Sample);
        assert_eq!(out.ledger.len(), 5);
        assert_relative_eq!(out.ledger.net_total(), 2730.0);
    }

    #[test]
    fn test_missing_default_file_falls_back_to_sample() {
        let pipeline = LedgerPipeline::new(PipelineOptions {
            default_statement: Some(PathBuf::from("/nonexistent/tally/statement.csv")),
            ..PipelineOptions::default()
        });
        let out = pipeline.run(None);
        assert_eq!(out.source, LedgerSource::Sample);
        assert_eq!(out.ledger.len(), 5);
    }

    #[test]
    fn test_headerless_upload_is_no_data() {
        let out = no_default().run(Some(RawTable::default()));
        assert_eq!(out.source, LedgerSource::Sample);
    }

    #[test]
    fn test_upload_single_column_path() {
        let out = no_default().run(Some(table(
            "Dato,Beløp,Tekst\n01.12.2023,\"-1,234.50 kr\",Rema 1000\n02.12.2023,abc,XYZCORP PURCHASE\n",
        )));
        assert_eq!(out.source, LedgerSource::Upload);
        let rows = out.ledger.transactions();
        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[0].amount, -1234.5);
        assert_eq!(rows[0].category, "Groceries 🛒");
        assert_eq!(rows[1].amount, 0.0);
        assert_eq!(rows[1].category, "Other");
    }

    #[test]
    fn test_bad_date_rejects_only_that_row() {
        let (ledger, rejected) = no_default().process_table(&table(
            "Date,Amount,Description\n2023-12-01,-10,Kiwi\nsoon,-20,Rema\n2023-12-03,-30,Meny\n",
        ));
        assert_eq!(ledger.len(), 2);
        assert_eq!(
            rejected,
            vec![RejectedRow {
                line: 2,
                date_text: "soon".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let (ledger, _) = no_default().process_table(&table("When,Sum\n2023-12-01,10\n"));
        assert_eq!(ledger.transactions()[0].description, "");
        assert_eq!(ledger.transactions()[0].category, "Other");
        assert_relative_eq!(ledger.transactions()[0].amount, 10.0);
    }

    #[test]
    fn test_supplied_blank_category_becomes_other() {
        let (ledger, _) = no_default().process_table(&table(
            "Date,Description,Amount,Category\n2023-12-01,Rema 1000,-5,\n2023-12-02,Kiwi,-6,Mat\n",
        ));
        assert_eq!(ledger.transactions()[0].category, "Other");
        assert_eq!(ledger.transactions()[1].category, "Mat");
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let ledger = sample_ledger();
        let formats = default_date_formats();
        let (once, rejected) = finalize(stage_ledger(&ledger), &formats);
        let (twice, _) = finalize(stage_ledger(&once), &formats);
        assert!(rejected.is_empty());
        assert_eq!(once, ledger);
        assert_eq!(twice, once);
    }
}
