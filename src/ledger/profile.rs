use super::Row;

const BANK_HEADER: [&str; 3] = ["Date", "Description", "Amount"];

/// Column positions of the fields of a transaction row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    pub details: Option<usize>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Failed to find the \"Date,Description,Amount\" header that starts the bank statement transactions")]
    MissingHeader,
}

/// The two ledger formats that get compared against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerProfile {
    /// Bank statement export. Starts with a variable number of summary rows, followed by a
    /// `Date,Description,Amount,...` header, followed by a balance row, followed by the transactions.
    BankStatement,

    /// Budget app export. A single header row followed by the transactions.
    BudgetExport,
}

impl LedgerProfile {
    pub fn name(self) -> &'static str {
        match self {
            LedgerProfile::BankStatement => "bank statement",
            LedgerProfile::BudgetExport => "budget export",
        }
    }

    pub fn layout(self) -> ColumnLayout {
        match self {
            LedgerProfile::BankStatement => ColumnLayout {
                date: 0,
                description: 1,
                amount: 2,
                details: None,
            },
            LedgerProfile::BudgetExport => ColumnLayout {
                date: 0,
                description: 2,
                amount: 4,
                details: Some(3),
            },
        }
    }

    /// Index of the first row holding a transaction. Can be `rows.len()` if there are none.
    pub fn data_start(self, rows: &[Row]) -> Result<usize, FormatError> {
        let start = match self {
            LedgerProfile::BankStatement => {
                let header = rows
                    .iter()
                    .position(is_bank_header)
                    .ok_or(FormatError::MissingHeader)?;
                // The header is followed by a balance row that isn't a transaction
                header + 2
            }
            LedgerProfile::BudgetExport => 1,
        };
        Ok(start.min(rows.len()))
    }
}

fn is_bank_header(row: &Row) -> bool {
    row.len() >= BANK_HEADER.len()
        && row
            .iter()
            .zip(BANK_HEADER)
            .all(|(field, expected)| field == expected)
}
