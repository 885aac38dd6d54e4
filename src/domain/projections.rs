//! Read-only views over the registry collections.
//!
//! Filters return borrowed subsequences in the original order; summaries
//! are computed over whatever slice they are given.

use super::models::{Property, Transaction, TransactionStatus};

fn matches(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Properties whose address, owner or id contains `query`, ignoring case.
///
/// An empty query keeps everything.
pub fn filter_properties<'a>(properties: &'a [Property], query: &str) -> Vec<&'a Property> {
    let needle = query.to_lowercase();
    properties
        .iter()
        .filter(|p| {
            needle.is_empty()
                || matches(&p.address, &needle)
                || matches(&p.owner, &needle)
                || matches(&p.id.to_string(), &needle)
        })
        .collect()
}

/// Transactions whose id, property id, sender or recipient contains `query`,
/// ignoring case.
pub fn filter_transactions<'a>(transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    let needle = query.to_lowercase();
    transactions
        .iter()
        .filter(|t| {
            needle.is_empty()
                || matches(&t.id.to_string(), &needle)
                || matches(&t.property_id.to_string(), &needle)
                || matches(&t.from_owner, &needle)
                || matches(&t.to_owner, &needle)
        })
        .collect()
}

/// Per-status counts for a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerSummary {
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
    /// Sum of `value` over completed transactions only.
    pub completed_value: f64,
}

impl LedgerSummary {
    pub fn from_transactions(transactions: &[&Transaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut summary, t| {
            match t.status {
                TransactionStatus::Completed => {
                    summary.completed += 1;
                    summary.completed_value += t.value;
                }
                TransactionStatus::Pending => summary.pending += 1,
                TransactionStatus::Failed => summary.failed += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.completed + self.pending + self.failed
    }
}

/// Registry-wide totals for the analytics panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegistryAnalytics {
    pub total_properties: usize,
    pub total_transactions: usize,
    pub total_value: f64,
}

impl RegistryAnalytics {
    pub fn compute(properties: &[Property], transactions: &[Transaction]) -> Self {
        Self {
            total_properties: properties.len(),
            total_transactions: transactions.len(),
            total_value: properties.iter().map(|p| p.value).sum(),
        }
    }
}

/// Inserts thousands separators: `1234567` becomes `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats an amount as US dollars with cents, e.g. `$1,234.50`.
///
/// Works on the decimal text, so amounts past `u64` keep every digit.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_digits(whole))
}

/// Formats a land area rounded to whole square feet, e.g. `2,500 sq ft`.
pub fn format_area(area: f64) -> String {
    format!("{} sq ft", group_digits(&format!("{:.0}", area.abs())))
}
