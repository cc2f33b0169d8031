//! Deterministic category rules for statement descriptions.
//!
//! Keywords target Norwegian bank exports plus a few general merchants.
//! Rules are tried in order against the lowercased description and the first
//! match wins, so a text with both a grocery and a restaurant keyword is
//! always groceries.

use tally_core::OTHER_CATEGORY;
use tally_ingest::StagedTable;
use tracing::debug;

/// When a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any keyword is a substring
    AnyOf(&'static [&'static str]),
    /// Every keyword is a substring
    AllOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: &'static str,
    pub trigger: Trigger,
}

impl CategoryRule {
    /// `text` must already be lowercase.
    pub fn matches(&self, text: &str) -> bool {
        match self.trigger {
            Trigger::AnyOf(keywords) => keywords.iter().any(|k| text.contains(k)),
            Trigger::AllOf(keywords) => keywords.iter().all(|k| text.contains(k)),
        }
    }
}

pub static CATEGORY_RULES: &[CategoryRule] = &[
    // Moving money between own accounts via the mobile bank
    CategoryRule {
        label: "Savings 🏦",
        trigger: Trigger::AllOf(&["kontoregulering", "mobil overføring"]),
    },
    CategoryRule {
        label: "Groceries 🛒",
        trigger: Trigger::AnyOf(&[
            "meny", "rema", "kiwi", "bunnpris", "coop", "joker", "dagligvare", "extra", "spar",
        ]),
    },
    CategoryRule {
        label: "Food & Dining 🍔",
        trigger: Trigger::AnyOf(&[
            "mcd", "burger", "sushi", "pizza", "restaurant", "cafe", "starbucks", "boba", "thai",
            "vaffel", "bakeri", "espresso", "tea",
        ]),
    },
    CategoryRule {
        label: "Transport 🚆",
        trigger: Trigger::AnyOf(&[
            "ruter", "vipps:ruter", "vy", "flytoget", "uber", "taxi", "bolt", "parkering",
            "easypark", "apcoa", "voi", "ryde", "dott", "buss",
        ]),
    },
    CategoryRule {
        label: "Entertainment 🎬",
        trigger: Trigger::AnyOf(&[
            "netflix", "hbo", "spotify", "kino", "steam", "playstation", "bio", "disney",
        ]),
    },
    CategoryRule {
        label: "Bills & Utilities 💡",
        trigger: Trigger::AnyOf(&[
            "telia", "telenor", "nte", "strøm", "leie", "husleie", "forsikring", "tryg",
        ]),
    },
    CategoryRule {
        label: "Shopping 🛍️",
        trigger: Trigger::AnyOf(&[
            "klarna", "hm", "zara", "elkjøp", "power", "ikea", "clas ohlson", "normal", "apotek",
            "vitus", "blomster",
        ]),
    },
    CategoryRule {
        label: "Income/Transfer 💰",
        trigger: Trigger::AnyOf(&[
            "lønn", "salary", "deposit", "overføring innland", "vipps", "straksoverføring",
        ]),
    },
];

/// First rule matching the description, if any.
pub fn matching_rule(description: Option<&str>) -> Option<&'static CategoryRule> {
    let text = description.unwrap_or_default().to_lowercase();
    CATEGORY_RULES.iter().find(|rule| rule.matches(&text))
}

/// Category label for a description; `"Other"` when nothing matches.
pub fn categorize(description: Option<&str>) -> &'static str {
    matching_rule(description)
        .map(|rule| rule.label)
        .unwrap_or(OTHER_CATEGORY)
}

/// Fill categories for a table that came without a category column.
/// Supplied categories are never overridden.
pub fn categorize_table(mut staged: StagedTable) -> StagedTable {
    if staged.has_category_column {
        debug!("statement supplies its own categories");
        return staged;
    }

    for row in &mut staged.rows {
        row.category = Some(categorize(row.description.as_deref()).to_string());
    }
    staged
}
