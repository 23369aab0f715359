use clap::Parser;
use colored::*;

use committer_tools::cli::PushCommitsCli;
use committer_tools::config::PushConfig;
use committer_tools::error::PushError;
use committer_tools::logging;
use committer_tools::push::Pusher;
use committer_tools::vcs::{Git, Rbt};

fn run(cli: &PushCommitsCli) -> Result<(), PushError> {
    let config = PushConfig::resolve(cli.config.as_deref())?;
    let rbt = Rbt::new(config.review_client.clone());
    let reviews = Pusher::new(&Git, &rbt, &config, cli.dry_run).run()?;
    tracing::info!(closed = reviews.len(), dry_run = cli.dry_run, "done");
    Ok(())
}

fn main() {
    let cli = PushCommitsCli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "✗".red(), e);
        std::process::exit(e.exit_code());
    }
}
