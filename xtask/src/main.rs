mod check_grammar;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::{
    env,
    path::{Path, PathBuf},
};

fn main() -> Result<()> {
    let app = Xtask::parse();
    app.run()
}

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "tython development workflows")]
struct Xtask {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long = "verbose", short = 'v', global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Checks that every rule declared by the two `.ungram` grammar files
    /// has a dispatch-bucket classification in `tython-transform`.
    CheckGrammar(check_grammar::CheckGrammar),
}

impl Xtask {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Command::CheckGrammar(command) => command.run(self.verbose),
        }
    }
}

fn root_path() -> PathBuf {
    Path::new(
        &env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| env!("CARGO_MANIFEST_DIR").to_owned()),
    )
    .ancestors()
    .nth(1)
    .unwrap()
    .to_path_buf()
}
