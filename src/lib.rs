pub mod args;
pub mod cli;
pub mod filter;
pub mod ledger;
pub mod reconcile;
pub mod report;
pub mod terminal;
