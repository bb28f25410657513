use console::{pad_str, style, Alignment, StyledObject};

use crate::ledger::{Amount, Transaction};
use crate::reconcile::Reconciliation;
use crate::terminal::{BulletPointPrinter, LineWriter};

const AMOUNT_WIDTH: usize = 12;

/// A bank transaction that had several budget entries with the same amount to choose from
#[derive(Debug, PartialEq, Eq)]
pub struct AmbiguityNotice<'a> {
    pub transaction: &'a Transaction,
    pub candidates: Vec<&'a Transaction>,
    pub chosen: Option<&'a Transaction>,
}

/// Everything a reconciliation run produced, ready to be printed
#[derive(Debug)]
pub struct Report<'a> {
    pub match_count: usize,
    pub missing: Vec<&'a Transaction>,
    pub excluded: &'a [Transaction],
    pub bank_transactions: Vec<(&'a Transaction, Option<&'a Transaction>)>,
    pub unclaimed_budget_entries: Vec<&'a Transaction>,
    pub ambiguities: Vec<AmbiguityNotice<'a>>,
}

impl<'a> Report<'a> {
    pub fn new(reconciliation: &Reconciliation<'a>, excluded: &'a [Transaction]) -> Self {
        let source = reconciliation.source();
        let candidates = reconciliation.candidates();
        Self {
            match_count: reconciliation.match_count(),
            missing: reconciliation.missing().collect(),
            excluded,
            bank_transactions: reconciliation.source_with_matches().collect(),
            unclaimed_budget_entries: reconciliation.unmatched_candidates().collect(),
            ambiguities: reconciliation
                .ambiguities()
                .iter()
                .map(|ambiguity| AmbiguityNotice {
                    transaction: &source[ambiguity.source],
                    candidates: ambiguity
                        .candidates
                        .iter()
                        .map(move |&candidate| &candidates[candidate])
                        .collect(),
                    chosen: ambiguity.chosen.map(move |candidate| &candidates[candidate]),
                })
                .collect(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} matched, {} missing, {} filtered, {} budget entries unclaimed",
            self.match_count,
            self.missing.len(),
            self.excluded.len(),
            self.unclaimed_budget_entries.len(),
        )
    }

    pub fn print<W: LineWriter + Clone>(&self, printer: &BulletPointPrinter<W>, verbose: bool) {
        if verbose {
            self.print_details(printer);
        }

        if self.missing.is_empty() {
            printer.print_line(
                style("There are no missing transactions. Good job budgeter!")
                    .green()
                    .bold(),
            );
        } else {
            printer.print_line(style_header(&format!(
                "There are {} missing transactions:",
                self.missing.len()
            )));
            for transaction in &self.missing {
                printer.print_item(format_transaction(transaction));
            }
        }
        printer.print_line(style(self.summary()).dim());
    }

    fn print_details<W: LineWriter + Clone>(&self, printer: &BulletPointPrinter<W>) {
        print_section(
            printer,
            "Filtered transactions:",
            self.excluded.iter().map(format_transaction),
        );

        printer.print_line(style_header("Bank transactions with several potential matches:"));
        if self.ambiguities.is_empty() {
            printer.print_item(style("(none)").italic());
        }
        for ambiguity in &self.ambiguities {
            printer.print_item(format!(
                "{} matched with {}",
                format_transaction(ambiguity.transaction),
                ambiguity
                    .chosen
                    .map(format_transaction)
                    .unwrap_or_else(|| style("<nil>").italic().to_string()),
            ));
            let printer = printer.indent();
            for candidate in &ambiguity.candidates {
                printer.print_item(format_transaction(candidate));
            }
        }

        print_section(
            printer,
            "Bank transactions:",
            self.bank_transactions
                .iter()
                .map(|(transaction, matched)| format_with_matching(transaction, *matched)),
        );
        print_section(
            printer,
            "Unclaimed budget entries:",
            self.unclaimed_budget_entries
                .iter()
                .copied()
                .map(format_transaction),
        );
    }
}

fn print_section<W: LineWriter + Clone>(
    printer: &BulletPointPrinter<W>,
    header: &str,
    items: impl Iterator<Item = String>,
) {
    printer.print_line(style_header(header));
    let mut items = items.peekable();
    if items.peek().is_none() {
        printer.print_item(style("(none)").italic());
    }
    for item in items {
        printer.print_item(item);
    }
}

fn format_transaction(transaction: &Transaction) -> String {
    let details = transaction
        .details
        .as_ref()
        .map(|details| format!(" ({details})"))
        .unwrap_or_default();
    format!(
        "{} {} {}{}",
        style_date(&transaction.date),
        pad_str(
            &style_amount(transaction.amount).to_string(),
            AMOUNT_WIDTH,
            Alignment::Right,
            None
        ),
        style_description(&transaction.description),
        style_details(&details),
    )
}

fn format_with_matching(transaction: &Transaction, matched: Option<&Transaction>) -> String {
    let matched = matched
        .map(ToString::to_string)
        .unwrap_or_else(|| "<nil>".to_string());
    format!("[{} (matching: {})]", transaction, matched)
}

fn style_header(header: &str) -> StyledObject<&str> {
    style(header).bold().underlined()
}

fn style_date(date: &chrono::NaiveDate) -> StyledObject<String> {
    style(date.format("%Y-%m-%d").to_string())
}

fn style_amount(amount: Amount) -> StyledObject<String> {
    let result = style(amount.to_string()).bold();
    if amount.cents() < 0 {
        result.red()
    } else {
        result.green()
    }
}

fn style_description(description: &str) -> StyledObject<&str> {
    style(description).blue()
}

fn style_details(details: &str) -> StyledObject<&str> {
    style(details).dim()
}
