use approx::assert_relative_eq;
use std::path::PathBuf;
use tally_core::{FlowKind, YearMonth, DEFAULT_PRIORITY_PHRASE};
use tally_finance::{LedgerPipeline, LedgerSource, PipelineOptions, RejectedRow};
use tally_ingest::RawTable;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn upload(name: &str) -> RawTable {
    RawTable::from_path(fixture(name), b',').unwrap()
}

fn pipeline() -> LedgerPipeline {
    LedgerPipeline::new(PipelineOptions {
        default_statement: None,
        ..PipelineOptions::default()
    })
}

#[test]
fn test_dual_column_statement() {
    let out = pipeline().run(Some(upload("dual_columns.csv")));
    assert_eq!(out.source, LedgerSource::Upload);

    let rows = out.ledger.transactions();
    assert_eq!(rows.len(), 6);

    let amounts: Vec<f64> = rows.iter().map(|t| t.amount).collect();
    let expected = [30000.0, -1234.5, -5000.0, -129.0, -45.0, 500.0];
    for (got, want) in amounts.iter().zip(expected) {
        assert_relative_eq!(*got, want);
    }

    let categories: Vec<&str> = rows.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(
        categories,
        vec![
            "Income/Transfer 💰",
            "Groceries 🛒",
            "Savings 🏦",
            "Entertainment 🎬",
            "Other",
            "Income/Transfer 💰",
        ]
    );

    assert_eq!(
        out.rejected,
        vec![RejectedRow {
            line: 7,
            date_text: "not a date".to_string()
        }]
    );
    assert_relative_eq!(out.ledger.net_total(), 24091.5);
}

#[test]
fn test_month_filter_and_metrics() {
    let out = pipeline().run(Some(upload("dual_columns.csv")));
    let months: Vec<String> = out.ledger.months().iter().map(|m| m.to_string()).collect();
    assert_eq!(months, vec!["2024-01", "2023-12"]);

    let dec = out.ledger.for_month(YearMonth::new(2023, 12).unwrap());
    let m = dec.metrics();
    assert_eq!(m.count, 4);
    assert_relative_eq!(m.income, 30000.0);
    assert_relative_eq!(m.expense, -6363.5);
    assert_relative_eq!(m.net, 23636.5);

    let flow = dec.daily_flow();
    assert_eq!(flow.len(), 3);
    assert_eq!(flow[0].kind, FlowKind::Income);
    assert_relative_eq!(flow[0].amount, 28765.5);

    let spend = dec.spending_by_category();
    assert_eq!(spend[0].category, "Savings 🏦");
    assert_relative_eq!(spend[0].total, 5000.0);
}

#[test]
fn test_salary_sorts_last_within_its_day() {
    let out = pipeline().run(Some(upload("dual_columns.csv")));
    let ordered = out.ledger.display_order(DEFAULT_PRIORITY_PHRASE);
    let tail: Vec<&str> = ordered
        .iter()
        .rev()
        .take(2)
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(tail, vec!["Lønn Hector Trd AS", "Rema 1000 Lade"]);
    assert_eq!(ordered.transactions()[0].description, "Vipps straksoverføring");
}

#[test]
fn test_single_amount_statement() {
    let out = pipeline().run(Some(upload("single_amount.csv")));
    let rows = out.ledger.transactions();
    assert_eq!(rows.len(), 4);
    assert!(out.rejected.is_empty());

    assert_relative_eq!(rows[0].amount, -89.9);
    assert_eq!(rows[0].category, "Groceries 🛒");
    assert_eq!(rows[1].category, "Bills & Utilities 💡");
    assert_eq!(rows[2].category, "Income/Transfer 💰");
    assert_eq!(rows[3].amount, 0.0);
    assert_eq!(rows[3].category, "Other");
    assert_relative_eq!(out.ledger.net_total(), 24451.1, epsilon = 1e-9);
}

#[test]
fn test_supplied_categories_are_kept() {
    let out = pipeline().run(Some(upload("with_category.csv")));
    let rows = out.ledger.transactions();
    assert_eq!(rows[0].description, "Rema 1000");
    assert_eq!(rows[0].category, "Mat");
    assert_eq!(rows[1].category, "Other");
    assert_relative_eq!(rows[1].amount, -129.0);
}

#[test]
fn test_default_statement_is_used_without_upload() {
    let path = fixture("single_amount.csv");
    let pipeline = LedgerPipeline::new(PipelineOptions {
        default_statement: Some(path.clone()),
        ..PipelineOptions::default()
    });
    let out = pipeline.run(None);
    assert_eq!(out.source, LedgerSource::DefaultFile(path));
    assert_eq!(out.ledger.len(), 4);
}

#[test]
fn test_sample_when_nothing_available() {
    let out = pipeline().run(None);
    assert_eq!(out.source, LedgerSource::Sample);
    assert_eq!(out.ledger.len(), 5);
    assert_relative_eq!(out.ledger.net_total(), 2730.0);
}
