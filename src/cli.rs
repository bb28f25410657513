use anyhow::{anyhow, Context as _, Result};
use std::path::PathBuf;

use crate::args::Args;
use crate::filter::{self, FilterSet};
use crate::ledger::{self, LedgerProfile};
use crate::reconcile::{reconcile, MatchConfig};
use crate::report::Report;
use crate::terminal::{BulletPointPrinter, LineWriter};

pub const FILTER_FILE_NAME: &str = "filter.json";

pub fn main(args: Args) -> Result<()> {
    run(&args, &BulletPointPrinter::new_stdout())
}

fn run<W: LineWriter + Clone>(args: &Args, printer: &BulletPointPrinter<W>) -> Result<()> {
    log::info!(
        "Comparing bank statement {} to budget entries {}",
        args.bank_path.display(),
        args.budget_path.display(),
    );

    let bank_transactions = ledger::load(&args.bank_path, LedgerProfile::BankStatement)
        .with_context(|| {
            format!(
                "Failed to parse transactions for {}",
                args.bank_path.display()
            )
        })?;
    let budget_transactions = ledger::load(&args.budget_path, LedgerProfile::BudgetExport)
        .with_context(|| {
            format!(
                "Failed to parse transactions for {}",
                args.budget_path.display()
            )
        })?;

    let filter_path = match &args.filter_file {
        Some(path) => path.clone(),
        None => default_filter_path()?,
    };
    let filters = FilterSet::load(&filter_path)
        .with_context(|| format!("Failed to load filters from {}", filter_path.display()))?;

    let (bank_transactions, excluded) = filter::partition(bank_transactions, &filters);
    let config = MatchConfig {
        date_match_range_days: args.date_match_range_days,
        verbose: args.verbose,
    };
    let reconciliation = reconcile(&bank_transactions, &budget_transactions, &config);

    Report::new(&reconciliation, &excluded).print(printer, args.verbose);
    Ok(())
}

/// The filter file lives next to the executable
fn default_filter_path() -> Result<PathBuf> {
    let executable = std::env::current_exe().context("Failed to get path of the executable")?;
    let directory = executable
        .parent()
        .ok_or_else(|| anyhow!("Executable path {} has no parent", executable.display()))?;
    Ok(directory.join(FILTER_FILE_NAME))
}
