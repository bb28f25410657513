use anyhow::{Context as _, Result};
use regex::Regex;
use serde::Deserialize;
use std::{
    fmt::{self, Display},
    path::Path,
};

use crate::ledger::{Amount, Transaction};

/// One entry of the filter file
#[derive(Debug, Deserialize)]
struct FilterConfig {
    regex: String,
    min: Amount,
    max: Amount,
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Filter {index} has an invalid regex '{pattern}'")]
    InvalidRegex {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Excludes transactions whose description matches `pattern` and whose amount is within `[min_amount, max_amount]`
#[derive(Debug, Clone)]
pub struct Filter {
    pattern: Regex,
    min_amount: Amount,
    max_amount: Amount,
}

impl Filter {
    pub fn new(pattern: &str, min_amount: Amount, max_amount: Amount) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            min_amount,
            max_amount,
        })
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        (self.min_amount..=self.max_amount).contains(&transaction.amount)
            && self.pattern.is_match(&transaction.description)
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[filter:'{}', min:{}, max:{}]",
            self.pattern.as_str(),
            self.min_amount,
            self.max_amount,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter file {}", path.display()))?;
        let filters = Self::from_json(&content)
            .with_context(|| format!("Failed to parse filter file {}", path.display()))?;
        log::info!("Found {} filters", filters.len());
        for filter in filters.iter() {
            log::debug!("Filter: {}", filter);
        }
        Ok(filters)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let configs: Vec<FilterConfig> = serde_json::from_str(json)?;
        let filters = configs
            .into_iter()
            .enumerate()
            .map(|(index, config)| {
                if config.min > config.max {
                    log::warn!(
                        "Filter {} for '{}' has min {} above max {} and will never match",
                        index,
                        config.regex,
                        config.min,
                        config.max,
                    );
                }
                Filter::new(&config.regex, config.min, config.max).map_err(|source| {
                    FilterError::InvalidRegex {
                        index,
                        pattern: config.regex,
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(filters))
    }

    /// A transaction is filtered if any of the filters matches it
    pub fn is_filtered(&self, transaction: &Transaction) -> bool {
        self.filters.iter().any(|filter| filter.matches(transaction))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Splits transactions into the ones to reconcile and the filtered ones, both in input order.
pub fn partition(
    transactions: Vec<Transaction>,
    filters: &FilterSet,
) -> (Vec<Transaction>, Vec<Transaction>) {
    let (kept, excluded): (Vec<_>, Vec<_>) = transactions
        .into_iter()
        .partition(|transaction| !filters.is_filtered(transaction));
    for transaction in &excluded {
        log::debug!("Filtered {}", transaction);
    }
    (kept, excluded)
}
