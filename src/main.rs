use anyhow::Result;
use env_logger::Env;

fn main() -> Result<()> {
    let args = budget_verifier::args::parse();
    let default_log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_log_level)).init();
    budget_verifier::cli::main(args)
}
