use std::path::PathBuf;

use clap::Parser;

/// Fetch JSON from a URL and print the value found by following KEYs
#[derive(Parser, Debug)]
#[command(name = "jsonurl", version)]
pub struct JsonUrlCli {
    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// URL serving a JSON document, then keys applied in order as nested
    /// lookups. Everything after the URL is a key, even `-v` or `--`.
    #[arg(
        value_name = "URL [KEY]",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl JsonUrlCli {
    pub fn url(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn keys(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }
}

/// Push the integration branch and mark its reviews as submitted
#[derive(Parser, Debug)]
#[command(name = "push-commits", version)]
pub struct PushCommitsCli {
    /// Perform a dry run
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Config file (defaults to ~/.push_commits.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
