//! Typed transactions parsed from bank statement and budget export CSV files

mod amount;
mod date;
mod parser;
mod profile;
mod transaction;

pub use amount::Amount;
pub use parser::{load, parse_rows, parse_transaction, read_rows, ParseError, Row};
pub use profile::{ColumnLayout, FormatError, LedgerProfile};
pub use transaction::Transaction;
