//! # mkvhost CLI
//!
//! Binary entry point for the `mkvhost` command-line tool. It parses the
//! arguments with `clap` and hands them to the library; any error that
//! reaches `main` is printed and the process exits with status 1.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
