//! Run orchestration: discovers files, fans them out over a `rayon`
//! worker pool sized by `--cores`, writes each translated file to disk,
//! and aggregates the per-file error report (spec.md §7).

use std::path::PathBuf;

use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::cli::Cli;
use crate::discover::{discover, output_path_for};
use crate::error::TythonError;
use crate::pipeline::translate_file;

pub struct Report {
    pub total: usize,
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, TythonError)>,
}

impl Report {
    /// spec.md §6: zero if at least one file was processed; per-file
    /// failures are reported but not fatal.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded.is_empty() && self.total > 0 {
            1
        } else {
            0
        }
    }
}

/// Runs with the grammar files resolved from `./grammar` relative to the
/// current directory — the layout expected at the repository root, where
/// the `tython` binary is normally invoked from.
pub fn run(cli: &Cli) -> Result<Report, TythonError> {
    run_with_grammar_dir(cli, &PathBuf::from("grammar"))
}

/// Same as [`run`], but with an explicit grammar directory — lets tests
/// point at the workspace's `grammar/` without depending on the test
/// runner's current directory.
pub fn run_with_grammar_dir(cli: &Cli, grammar_dir: &std::path::Path) -> Result<Report, TythonError> {
    let dialect = cli.dialect.into();

    let files = discover(&cli.input, dialect)?;
    info!("discovered {} file(s) under {}", files.len(), cli.input.display());

    let cores = cli.resolved_cores();
    debug!("worker pool sized to {cores} core(s)");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cores)
        .build()
        .map_err(|e| TythonError::Config(e.to_string()))?;

    let input_root = if cli.input.is_file() {
        cli.input.parent().map(|p| p.to_path_buf()).unwrap_or_default()
    } else {
        cli.input.clone()
    };

    let results: Vec<Result<PathBuf, (PathBuf, TythonError)>> = pool.install(|| {
        files
            .par_iter()
            .map(|file| process_one(file, &input_root, cli, dialect, grammar_dir))
            .collect()
    });

    let mut report = Report {
        total: files.len(),
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    for result in results {
        match result {
            Ok(path) => report.succeeded.push(path),
            Err((file, err)) => report.failed.push((file, err)),
        }
    }

    for (file, err) in &report.failed {
        if cli.debug {
            error!("{file}: {err}", file = file.display());
        } else {
            error!("{file}: {line}", file = file.display(), line = err.first_line());
        }
    }
    if !report.failed.is_empty() {
        warn!("{} of {} file(s) failed translation", report.failed.len(), report.total);
    }
    info!("{} of {} file(s) translated successfully", report.succeeded.len(), report.total);

    Ok(report)
}

fn process_one(
    file: &std::path::Path,
    input_root: &std::path::Path,
    cli: &Cli,
    dialect: tython_parser::Dialect,
    grammar_dir: &std::path::Path,
) -> Result<PathBuf, (PathBuf, TythonError)> {
    let contents = std::fs::read_to_string(file).map_err(|source| {
        (
            file.to_path_buf(),
            TythonError::Io { file: file.to_path_buf(), source },
        )
    })?;

    let translated = translate_file(file, &contents, dialect, grammar_dir, cli.convert_snake_case)
        .map_err(|e| (file.to_path_buf(), e))?;

    if cli.debug {
        debug!("{file}: Python AST:\n{ast}", file = file.display(), ast = translated.ast_debug);
    }

    let out_path = output_path_for(input_root, file, &cli.output, cli.convert_snake_case);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| {
            (
                file.to_path_buf(),
                TythonError::Io { file: file.to_path_buf(), source },
            )
        })?;
    }
    std::fs::write(&out_path, translated.source).map_err(|source| {
        (
            file.to_path_buf(),
            TythonError::Io { file: file.to_path_buf(), source },
        )
    })?;

    Ok(out_path)
}
