use clap::Parser;
use std::path::PathBuf;

use crate::reconcile::DEFAULT_DATE_MATCH_RANGE_DAYS;

/// Compare a bank statement to budget entries and list the bank transactions missing from the budget.
#[derive(Parser, Debug)]
pub struct Args {
    /// Path to the bank statement CSV
    pub bank_path: PathBuf,

    /// Path to the budget export CSV
    pub budget_path: PathBuf,

    /// Path to the filter file [default: filter.json next to the executable]
    #[clap(long)]
    pub filter_file: Option<PathBuf>,

    /// Maximum number of days a budget entry may be dated before its bank transaction
    #[clap(long, default_value_t = DEFAULT_DATE_MATCH_RANGE_DAYS)]
    pub date_match_range_days: u32,

    /// Print filtered transactions, ambiguous matches and all bank transactions with their matches
    #[clap(short, long)]
    pub verbose: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["budget-verifier", "bank.csv", "budget.csv"]).unwrap();
        assert_eq!(PathBuf::from("bank.csv"), args.bank_path);
        assert_eq!(PathBuf::from("budget.csv"), args.budget_path);
        assert_eq!(None, args.filter_file);
        assert_eq!(7, args.date_match_range_days);
        assert!(!args.verbose);
    }

    #[test]
    fn all_options() {
        let args = Args::try_parse_from([
            "budget-verifier",
            "-v",
            "--filter-file",
            "/etc/filters.json",
            "--date-match-range-days",
            "3",
            "bank.csv",
            "budget.csv",
        ])
        .unwrap();
        assert_eq!(Some(PathBuf::from("/etc/filters.json")), args.filter_file);
        assert_eq!(3, args.date_match_range_days);
        assert!(args.verbose);
    }

    #[test]
    fn requires_both_paths() {
        assert!(Args::try_parse_from(["budget-verifier"]).is_err());
        assert!(Args::try_parse_from(["budget-verifier", "bank.csv"]).is_err());
        assert!(
            Args::try_parse_from(["budget-verifier", "bank.csv", "budget.csv", "extra.csv"])
                .is_err()
        );
    }
}
