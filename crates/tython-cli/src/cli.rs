//! The flag table from spec.md §6, as a `clap` derive `Args` struct.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tython_parser::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Ts,
    Js,
}

impl From<DialectArg> for Dialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Ts => Dialect::Ts,
            DialectArg::Js => Dialect::Js,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tython", about = "Translates TypeScript/JavaScript sources into Python")]
pub struct Cli {
    /// A file or directory of input sources.
    #[arg(long, default_value = "./")]
    pub input: PathBuf,

    /// Output root directory.
    #[arg(long, default_value = "./out/")]
    pub output: PathBuf,

    /// Input dialect selector.
    #[arg(long = "type", value_enum, default_value_t = DialectArg::Ts)]
    pub dialect: DialectArg,

    /// Emits verbose trace logs and dumps the Python AST.
    #[arg(long)]
    pub debug: bool,

    /// Worker parallelism; clamped to `[1, available parallelism]`.
    #[arg(long)]
    pub cores: Option<usize>,

    /// Apply snake-casing to identifiers at emit time.
    #[arg(long)]
    pub convert_snake_case: bool,
}

impl Cli {
    /// Resolves `--cores`, defaulting to `max(1, CPU-2)` and clamping any
    /// explicit value into `[1, available parallelism]` (spec.md §6).
    pub fn resolved_cores(&self) -> usize {
        let max_cpu = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        match self.cores {
            Some(requested) => requested.clamp(1, max_cpu),
            None => (max_cpu.saturating_sub(2)).max(1),
        }
    }
}
