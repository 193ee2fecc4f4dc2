//! amalgamate - fold a header/implementation-split C++ library into headers
//!
//! amalgamate provides:
//! - Rewriting of library-namespace includes to relative paths
//! - Merging of each .cpp into its same-named .hpp behind an include guard
//!   and an implementation toggle
//! - Unified output format (jsonl/json/md) describing every change

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
