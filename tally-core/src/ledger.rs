//! The canonical ledger and the queries the presentation layer runs on it:
//! month grouping, filtering, metrics, daily flow, spending by category, and
//! display ordering.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::month::YearMonth;
use crate::transaction::Transaction;

/// Description phrase that sorts last within a day (the salary entry).
pub const DEFAULT_PRIORITY_PHRASE: &str = "Lønn Hector Trd AS";

/// Ordered transactions, one per accepted input row, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

/// Net / income / expense totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub net: f64,
    pub income: f64,
    /// Sum of negative amounts (stays negative)
    pub expense: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowKind {
    Income,
    Expense,
}

/// Net money movement on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub amount: f64,
    pub kind: FlowKind,
}

/// Absolute spend for one category label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Distinct months present, newest first.
    pub fn months(&self) -> Vec<YearMonth> {
        let set: BTreeSet<YearMonth> = self.transactions.iter().map(|t| t.month()).collect();
        set.into_iter().rev().collect()
    }

    /// Rows whose date falls in `month`, order preserved.
    pub fn for_month(&self, month: YearMonth) -> Ledger {
        self.filter(|t| month.contains(t.date))
    }

    pub fn filter(&self, mut keep: impl FnMut(&Transaction) -> bool) -> Ledger {
        Ledger::new(
            self.transactions
                .iter()
                .filter(|t| keep(t))
                .cloned()
                .collect(),
        )
    }

    pub fn net_total(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    pub fn income_total(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum()
    }

    pub fn expense_total(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum()
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            net: self.net_total(),
            income: self.income_total(),
            expense: self.expense_total(),
            count: self.len(),
        }
    }

    /// Per-day sums, oldest first. A day nets to income only when its sum is positive.
    pub fn daily_flow(&self) -> Vec<DailyFlow> {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for t in &self.transactions {
            *by_day.entry(t.date).or_insert(0.0) += t.amount;
        }

        by_day
            .into_iter()
            .map(|(date, amount)| DailyFlow {
                date,
                amount,
                kind: if amount > 0.0 {
                    FlowKind::Income
                } else {
                    FlowKind::Expense
                },
            })
            .collect()
    }

    /// Expenses grouped by category as positive totals, largest first.
    pub fn spending_by_category(&self) -> Vec<CategorySpend> {
        let mut groups: HashMap<&str, (f64, usize)> = HashMap::new();
        for t in self.transactions.iter().filter(|t| t.is_expense()) {
            let entry = groups.entry(t.category.as_str()).or_insert((0.0, 0));
            entry.0 += t.amount.abs();
            entry.1 += 1;
        }

        let mut spend: Vec<CategorySpend> = groups
            .into_iter()
            .map(|(category, (total, count))| CategorySpend {
                category: category.to_string(),
                total,
                count,
            })
            .collect();

        spend.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });
        spend
    }

    /// Newest date first; within a date, rows mentioning `priority_phrase` go last.
    pub fn display_order(&self, priority_phrase: &str) -> Ledger {
        let mut rows = self.transactions.clone();
        rows.sort_by_key(|t| {
            (
                std::cmp::Reverse(t.date),
                !priority_phrase.is_empty() && t.description_contains(priority_phrase),
            )
        });
        Ledger::new(rows)
    }
}

impl FromIterator<Transaction> for Ledger {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Ledger::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
