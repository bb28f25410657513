use chrono::NaiveDate;
use std::fmt::{self, Display};

use super::Amount;

/// A single ledger line. Two transactions are only related through a reconciliation,
/// never through the transactions themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Only budget exports carry a details column
    pub details: Option<String>,
    pub amount: Amount,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Amount) -> Self {
        Self {
            date,
            description: description.into(),
            details: None,
            amount,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}: '{}', '{}', {}]",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.details.as_deref().unwrap_or(""),
            self.amount,
        )
    }
}
