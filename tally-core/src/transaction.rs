//! Canonical transaction row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::month::YearMonth;

/// Label used when no rule matched and the source supplied no category.
pub const OTHER_CATEGORY: &str = "Other";

/// One normalized statement row.
///
/// Field order is the canonical column order: Date, Description, Amount, Category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Description")]
    pub description: String,
    /// Positive = inflow, negative = outflow
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Category")]
    pub category: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    /// Year-month grouping key
    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Case-insensitive substring test on the description.
    pub fn description_contains(&self, phrase: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&phrase.to_lowercase())
    }
}
