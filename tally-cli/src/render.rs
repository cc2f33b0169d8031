//! Plain-text, CSV and JSON output of the canonical ledger.

use anyhow::{Context, Result};
use std::io::Write;

use tally_core::{FlowKind, Ledger, Metrics};

/// `-1234.5` → `-1,234.50 kr`
pub fn format_amount(value: f64, suffix: &str) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    if suffix.is_empty() {
        format!("{sign}{grouped}.{frac_part}")
    } else {
        format!("{sign}{grouped}.{frac_part} {suffix}")
    }
}

pub fn write_table(out: &mut impl Write, ledger: &Ledger, suffix: &str) -> Result<()> {
    let desc_width = ledger
        .iter()
        .map(|t| t.description.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(11, 40);

    writeln!(
        out,
        "{:<10}  {:<22}  {:<desc_width$}  {:>18}",
        "Date", "Category", "Description", "Amount"
    )?;
    for t in ledger {
        let description: String = t.description.chars().take(desc_width).collect();
        writeln!(
            out,
            "{:<10}  {:<22}  {:<desc_width$}  {:>18}",
            t.date.format("%Y-%m-%d").to_string(),
            t.category,
            description,
            format_amount(t.amount, suffix)
        )?;
    }
    Ok(())
}

const CSV_HEADER: [&str; 4] = ["Date", "Description", "Amount", "Category"];

/// The header is written up front so an empty ledger still yields the columns.
pub fn write_csv(out: impl Write, ledger: &Ledger) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(CSV_HEADER).context("write CSV header")?;
    for t in ledger {
        wtr.serialize(t).context("write CSV row")?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json(out: &mut impl Write, ledger: &Ledger) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, ledger).context("write JSON")?;
    writeln!(out)?;
    Ok(())
}

pub fn write_summary(out: &mut impl Write, ledger: &Ledger, suffix: &str) -> Result<()> {
    let Metrics {
        net,
        income,
        expense,
        count,
    } = ledger.metrics();

    writeln!(out, "Transactions   {count}")?;
    writeln!(out, "Net Balance    {}", format_amount(net, suffix))?;
    writeln!(out, "Total Income   {}", format_amount(income, suffix))?;
    writeln!(out, "Total Expenses {}", format_amount(expense, suffix))?;

    writeln!(out, "\n## Daily Money Flow\n")?;
    for day in ledger.daily_flow() {
        let kind = match day.kind {
            FlowKind::Income => "income",
            FlowKind::Expense => "expense",
        };
        writeln!(
            out,
            "{}  {:>18}  {kind}",
            day.date.format("%Y-%m-%d"),
            format_amount(day.amount, suffix)
        )?;
    }

    writeln!(out, "\n## Spending by Category\n")?;
    let spend = ledger.spending_by_category();
    if spend.is_empty() {
        writeln!(out, "No expenses found to categorize.")?;
    }
    for s in spend {
        writeln!(
            out,
            "{:<22}  {:>18}  ({} txns)",
            s.category,
            format_amount(s.total, suffix),
            s.count
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::Transaction;

    fn ledger() -> Ledger {
        let d = |day| NaiveDate::from_ymd_opt(2023, 12, day).unwrap();
        Ledger::new(vec![
            Transaction::new(d(1), "Rema 1000", -150.0, "Groceries 🛒"),
            Transaction::new(d(2), "Salary", 3000.0, "Income 💰"),
        ])
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(-1234.5, "kr"), "-1,234.50 kr");
        assert_eq!(format_amount(1234567.891, ""), "1,234,567.89");
        assert_eq!(format_amount(0.0, "kr"), "0.00 kr");
        assert_eq!(format_amount(-0.001, "kr"), "0.00 kr");
        assert_eq!(format_amount(999.999, "kr"), "1,000.00 kr");
        assert_eq!(format_amount(100.0, "kr"), "100.00 kr");
    }

    #[test]
    fn test_csv_has_canonical_columns() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &ledger()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Date,Description,Amount,Category"));
        assert_eq!(lines.next(), Some("2023-12-01,Rema 1000,-150.0,Groceries 🛒"));
        assert_eq!(lines.next(), Some("2023-12-02,Salary,3000.0,Income 💰"));
        assert_eq!(lines.next(), None);

        let mut buf = Vec::new();
        write_csv(&mut buf, &Ledger::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Date,Description,Amount,Category\n");
    }

    #[test]
    fn test_summary_mentions_totals() {
        let mut buf = Vec::new();
        write_summary(&mut buf, &ledger(), "kr").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Net Balance    2,850.00 kr"));
        assert!(text.contains("Total Expenses -150.00 kr"));
        assert!(text.contains("Groceries 🛒"));
    }

    #[test]
    fn test_table_lists_rows() {
        let mut buf = Vec::new();
        write_table(&mut buf, &ledger(), "kr").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("3,000.00 kr"));
    }
}
