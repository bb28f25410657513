use anyhow::{Context as _, Result};
use std::{fs::File, io::Read, path::Path};

use super::{date::parse_date, Amount, ColumnLayout, FormatError, LedgerProfile, Transaction};

pub type Row = csv::StringRecord;

/// Reason a single row couldn't be turned into a transaction
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Row has {len} fields but needs a field at index {index}")]
    MissingField { index: usize, len: usize },

    #[error("Invalid date '{value}', expected MM/DD/YYYY")]
    InvalidDate { value: String },

    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: &'static str },
}

pub fn load(path: &Path, profile: LedgerProfile) -> Result<Vec<Transaction>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let rows = read_rows(file).with_context(|| format!("Failed to read {}", path.display()))?;
    let transactions = parse_rows(&rows, profile)?;
    log::info!(
        "Parsed {} transactions from {} {}",
        transactions.len(),
        profile.name(),
        path.display(),
    );
    Ok(transactions)
}

/// Reads all rows of a CSV file. Rows may have different numbers of fields.
/// Bytes that aren't valid UTF-8 are replaced with U+FFFD, only that row is affected.
pub fn read_rows(input_stream: impl Read) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input_stream);
    let mut rows = reader
        .byte_records()
        .map(|record| Ok(decode_row(record?)))
        .collect::<Result<Vec<Row>, csv::Error>>()?;
    if let Some(first_row) = rows.first_mut() {
        maybe_remove_byte_order_mark(first_row);
    }
    Ok(rows)
}

fn decode_row(record: csv::ByteRecord) -> Row {
    let line = record.position().map(|position| position.line());
    Row::from_byte_record(record).unwrap_or_else(|err| {
        log::warn!(
            "Row at line {} isn't valid UTF-8, replacing invalid characters",
            line.map_or_else(|| "?".to_string(), |line| line.to_string()),
        );
        Row::from_byte_record_lossy(err.into_byte_record())
    })
}

fn maybe_remove_byte_order_mark(row: &mut Row) {
    let Some(stripped) = row.get(0).and_then(|field| field.strip_prefix('\u{FEFF}')) else {
        return;
    };
    let mut fields = vec![stripped.to_string()];
    fields.extend(row.iter().skip(1).map(str::to_string));
    *row = Row::from(fields);
}

/// Parses the transaction rows of a ledger. Rows that aren't valid transactions are skipped with a warning.
pub fn parse_rows(rows: &[Row], profile: LedgerProfile) -> Result<Vec<Transaction>, FormatError> {
    let start = profile.data_start(rows)?;
    let layout = profile.layout();
    let transactions = rows
        .iter()
        .enumerate()
        .skip(start)
        .filter_map(|(index, row)| match parse_transaction(row, &layout) {
            Ok(transaction) => Some(transaction),
            Err(err) => {
                log::warn!(
                    "Invalid record in row {} of {}, skipping: {}",
                    index + 1,
                    profile.name(),
                    err,
                );
                None
            }
        })
        .collect();
    Ok(transactions)
}

pub fn parse_transaction(row: &Row, layout: &ColumnLayout) -> Result<Transaction, ParseError> {
    let date_field = field(row, layout.date)?;
    let date = parse_date(date_field).ok_or_else(|| ParseError::InvalidDate {
        value: date_field.to_string(),
    })?;
    let amount_field = field(row, layout.amount)?;
    let amount = Amount::parse(amount_field).map_err(|reason| ParseError::InvalidAmount {
        value: amount_field.to_string(),
        reason,
    })?;
    let description = field(row, layout.description)?.to_string();
    let details = match layout.details {
        Some(index) => Some(field(row, index)?)
            .filter(|details| !details.is_empty())
            .map(str::to_string),
        None => None,
    };
    Ok(Transaction {
        date,
        description,
        details,
        amount,
    })
}

fn field(row: &Row, index: usize) -> Result<&str, ParseError> {
    row.get(index).ok_or(ParseError::MissingField {
        index,
        len: row.len(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::io::Write as _;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    const BANK_STATEMENT: &str = "\
Description,,Summary Amt.
Beginning balance as of 01/01/2024,,\"1,000.00\"
Total credits,,\"2,500.00\"
Ending balance as of 01/31/2024,,\"3,479.50\"

Date,Description,Amount,Running Bal.
01/01/2024,Beginning balance as of 01/01/2024,,\"1,000.00\"
01/02/2024,COFFEE SHOP #12,-5.00,995.00
01/03/2024,PAYROLL DEPOSIT,\"2,500.00\",\"3,495.00\"
01/04/2024,Pending,,
01/05/2024,GROCERY STORE,-15.50,\"3,479.50\"
";

    const BUDGET_EXPORT: &str = "\
Date,Account,Payee,Memo,Amount
01/01/2024,Checking,Coffee Shop,morning coffee,-5.00
not a date,Checking,Broken,,-1.00
01/02/2024,Checking,Employer,,\"2,500.00\"
01/04/2024,Checking,Grocery Store,,-15.5
01/05/2024,Checking
";

    #[test]
    fn parses_bank_statement() {
        let rows = read_rows(BANK_STATEMENT.as_bytes()).unwrap();
        let transactions = parse_rows(&rows, LedgerProfile::BankStatement).unwrap();
        assert_eq!(
            vec![
                Transaction::new(date(2024, 1, 2), "COFFEE SHOP #12", Amount::from_cents(-500)),
                Transaction::new(
                    date(2024, 1, 3),
                    "PAYROLL DEPOSIT",
                    Amount::from_cents(250000)
                ),
                Transaction::new(date(2024, 1, 5), "GROCERY STORE", Amount::from_cents(-1550)),
            ],
            transactions
        );
    }

    #[test]
    fn parses_budget_export() {
        let rows = read_rows(BUDGET_EXPORT.as_bytes()).unwrap();
        let transactions = parse_rows(&rows, LedgerProfile::BudgetExport).unwrap();
        assert_eq!(
            vec![
                Transaction::new(date(2024, 1, 1), "Coffee Shop", Amount::from_cents(-500))
                    .with_details("morning coffee"),
                Transaction::new(date(2024, 1, 2), "Employer", Amount::from_cents(250000)),
                Transaction::new(date(2024, 1, 4), "Grocery Store", Amount::from_cents(-1550)),
            ],
            transactions
        );
    }

    #[test]
    fn bank_statement_without_header_is_an_error() {
        let rows = read_rows(BUDGET_EXPORT.as_bytes()).unwrap();
        assert_eq!(
            Err(FormatError::MissingHeader),
            parse_rows(&rows, LedgerProfile::BankStatement)
        );
    }

    #[test]
    fn empty_budget_export() {
        let rows = read_rows("".as_bytes()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(Ok(vec![]), parse_rows(&rows, LedgerProfile::BudgetExport));
    }

    #[test]
    fn removes_byte_order_mark() {
        let rows = read_rows("\u{FEFF}Date,Description,Amount\nbalance\n01/02/2024,Coffee,-5.00\n".as_bytes())
            .unwrap();
        assert_eq!(Some("Date"), rows[0].get(0));
        assert_eq!(
            Ok(vec![Transaction::new(
                date(2024, 1, 2),
                "Coffee",
                Amount::from_cents(-500)
            )]),
            parse_rows(&rows, LedgerProfile::BankStatement)
        );
    }

    #[test]
    fn invalid_utf8_only_affects_its_row() {
        let mut input = b"Date,Account,Payee,Memo,Amount\n".to_vec();
        input.extend_from_slice(b"01/01/2024,Checking,Coffee,,-5.00\n");
        input.extend_from_slice(b"01/02/2024,Checking,CAF\xC9,,-3.50\n");
        input.extend_from_slice(b"01/03/2024,Checking,Books,,-25.99\n");
        let rows = read_rows(input.as_slice()).unwrap();
        assert_eq!(4, rows.len());
        let transactions = parse_rows(&rows, LedgerProfile::BudgetExport).unwrap();
        assert_eq!(
            vec![
                Transaction::new(date(2024, 1, 1), "Coffee", Amount::from_cents(-500)),
                Transaction::new(date(2024, 1, 2), "CAF\u{FFFD}", Amount::from_cents(-350)),
                Transaction::new(date(2024, 1, 3), "Books", Amount::from_cents(-2599)),
            ],
            transactions
        );
    }

    #[test]
    fn parse_transaction_errors() {
        let layout = LedgerProfile::BankStatement.layout();
        assert_eq!(
            Err(ParseError::MissingField { index: 2, len: 2 }),
            parse_transaction(&Row::from(vec!["01/02/2024", "Coffee"]), &layout)
        );
        assert_eq!(
            Err(ParseError::InvalidDate {
                value: "2024-01-02".to_string()
            }),
            parse_transaction(&Row::from(vec!["2024-01-02", "Coffee", "-5.00"]), &layout)
        );
        assert_eq!(
            Err(ParseError::InvalidAmount {
                value: "".to_string(),
                reason: "Empty amount"
            }),
            parse_transaction(&Row::from(vec!["01/02/2024", "Coffee", ""]), &layout)
        );
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BANK_STATEMENT.as_bytes()).unwrap();
        let transactions = load(file.path(), LedgerProfile::BankStatement).unwrap();
        assert_eq!(3, transactions.len());
    }

    #[test]
    fn load_nonexisting_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let err = load(&tempdir.path().join("missing.csv"), LedgerProfile::BudgetExport)
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open"));
    }
}
