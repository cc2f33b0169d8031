//! Column role inference for arbitrary statement headers.
//!
//! Roles are resolved in a fixed order by rules-as-data: substring matches
//! accept bank naming like "Transaction Date" or "Merchant Name", while the
//! debit role needs an exact name so compound headers don't match by accident.
//! Positional fallbacks assume the common (date, amount, description) layout.
//!
//! A column claimed by an earlier role is never handed to a later one. The
//! single-column amount fallback (position 1) only yields to date and
//! description, so a lone credit column there is read as the amount.

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Date,
    Description,
    Credit,
    Debit,
    Category,
}

/// How a header name is tested (against its trimmed, lowercased form)
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    Contains(&'static [&'static str]),
    Exact(&'static [&'static str]),
}

impl Matcher {
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        match self {
            Matcher::Contains(needles) => needles.iter().any(|n| name.contains(n)),
            Matcher::Exact(names) => names.iter().any(|n| name == *n),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnRule {
    pub role: Role,
    pub matcher: Matcher,
    /// Column position used when no header matches
    pub fallback: Option<usize>,
}

/// Evaluation order matters: earlier roles claim columns first.
pub static COLUMN_RULES: &[ColumnRule] = &[
    ColumnRule {
        role: Role::Date,
        matcher: Matcher::Contains(&["date", "time"]),
        fallback: Some(0),
    },
    ColumnRule {
        role: Role::Description,
        matcher: Matcher::Contains(&["desc", "merchant", "name"]),
        fallback: Some(2),
    },
    ColumnRule {
        role: Role::Credit,
        matcher: Matcher::Contains(&["receive", "credit", "deposit"]),
        fallback: None,
    },
    ColumnRule {
        role: Role::Debit,
        matcher: Matcher::Exact(&["amount", "debit", "withdraw", "payment"]),
        fallback: None,
    },
    ColumnRule {
        role: Role::Category,
        matcher: Matcher::Contains(&["cat"]),
        fallback: None,
    },
];

/// Position of the amount column when neither debit nor a dual layout exists.
const SINGLE_AMOUNT_FALLBACK: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchKind {
    Header,
    Position,
}

/// Outcome of one rule: which column it picked and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleMatch {
    pub column: ColumnRef,
    pub kind: MatchKind,
}

impl ColumnRule {
    /// Try this rule against the headers, skipping already-claimed positions.
    pub fn resolve(&self, headers: &[String], claimed: &[usize]) -> Option<RoleMatch> {
        let free = |i: &usize| !claimed.contains(i);

        let by_name = (0..headers.len())
            .filter(free)
            .find(|&i| self.matcher.matches(&headers[i]))
            .map(|index| (index, MatchKind::Header));

        let by_position = || {
            self.fallback
                .filter(|i| *i < headers.len() && free(i))
                .map(|index| (index, MatchKind::Position))
        };

        by_name.or_else(by_position).map(|(index, kind)| RoleMatch {
            column: ColumnRef {
                index,
                name: headers[index].clone(),
            },
            kind,
        })
    }
}

/// Role → column mapping for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoleMap {
    pub date: Option<RoleMatch>,
    pub description: Option<RoleMatch>,
    pub credit: Option<RoleMatch>,
    pub debit: Option<RoleMatch>,
    pub category: Option<RoleMatch>,
    /// Column 1 for the single-column amount path (only set without a debit column)
    pub positional_amount: Option<ColumnRef>,
}

impl ColumnRoleMap {
    pub fn get(&self, role: Role) -> Option<&ColumnRef> {
        let slot = match role {
            Role::Date => &self.date,
            Role::Description => &self.description,
            Role::Credit => &self.credit,
            Role::Debit => &self.debit,
            Role::Category => &self.category,
        };
        slot.as_ref().map(|m| &m.column)
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<RoleMatch> {
        match role {
            Role::Date => &mut self.date,
            Role::Description => &mut self.description,
            Role::Credit => &mut self.credit,
            Role::Debit => &mut self.debit,
            Role::Category => &mut self.category,
        }
    }

    /// Both credit and debit resolved: amounts are netted.
    pub fn has_dual_amount(&self) -> bool {
        self.credit.is_some() && self.debit.is_some()
    }

    /// Amount column for the single-column path: debit, else position 1.
    pub fn single_amount_column(&self) -> Option<&ColumnRef> {
        self.get(Role::Debit).or(self.positional_amount.as_ref())
    }
}

/// Column 1 when there is no debit column and date/description left it free.
fn positional_amount(headers: &[String], map: &ColumnRoleMap) -> Option<ColumnRef> {
    if map.debit.is_some() {
        return None;
    }
    let taken = [&map.date, &map.description]
        .into_iter()
        .flatten()
        .any(|m| m.column.index == SINGLE_AMOUNT_FALLBACK);
    if taken {
        return None;
    }
    headers.get(SINGLE_AMOUNT_FALLBACK).map(|name| ColumnRef {
        index: SINGLE_AMOUNT_FALLBACK,
        name: name.clone(),
    })
}

/// Assign roles to the headers of one table.
pub fn infer_roles(headers: &[String]) -> ColumnRoleMap {
    let mut map = ColumnRoleMap::default();
    let mut claimed: Vec<usize> = Vec::new();

    for rule in COLUMN_RULES {
        if rule.role == Role::Category {
            // the single-column amount is settled before category is searched
            map.positional_amount = positional_amount(headers, &map);
            claimed.extend(map.positional_amount.as_ref().map(|c| c.index));
        }
        if let Some(found) = rule.resolve(headers, &claimed) {
            claimed.push(found.column.index);
            *map.slot_mut(rule.role) = Some(found);
        }
    }

    debug!(
        date = ?map.get(Role::Date).map(|c| &c.name),
        description = ?map.get(Role::Description).map(|c| &c.name),
        credit = ?map.get(Role::Credit).map(|c| &c.name),
        debit = ?map.get(Role::Debit).map(|c| &c.name),
        category = ?map.get(Role::Category).map(|c| &c.name),
        "inferred column roles"
    );

    map
}
