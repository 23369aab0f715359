use clap::Parser;
use colored::*;

use committer_tools::cli::JsonUrlCli;
use committer_tools::{jsonurl, logging};

fn main() {
    let cli = JsonUrlCli::parse();
    logging::init(cli.verbose);

    let program = std::env::args().next().unwrap_or_else(|| "jsonurl".to_string());
    match jsonurl::run(&cli, &program) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(e.exit_code());
        }
    }
}
