//! Built-in demo ledger used when no statement is available.

use chrono::NaiveDate;
use tally_core::{Ledger, Transaction};

const SAMPLE_ROWS: &[(i32, u32, u32, &str, f64, &str)] = &[
    (2023, 12, 1, "Grocery Store", -150.00, "Groceries 🛒"),
    (2023, 12, 2, "Salary", 3000.00, "Income 💰"),
    (2023, 12, 5, "Netflix", -15.00, "Entertainment 🎬"),
    (2023, 12, 8, "Gas Station", -45.00, "Transport 🚆"),
    (2023, 12, 10, "Restaurant", -60.00, "Food & Dining 🍔"),
];

/// Five fixed, already-canonical rows (net 2730).
pub fn sample_ledger() -> Ledger {
    SAMPLE_ROWS
        .iter()
        .filter_map(|&(y, m, d, description, amount, category)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| Transaction::new(date, description, amount, category))
        })
        .collect()
}
