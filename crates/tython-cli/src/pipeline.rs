//! The per-file pipeline: parse -> transform -> serialize -> post-process.
//! Each call gets fresh parser/transformer state (spec.md §5 — no shared
//! mutable state across files), so this is what the worker pool in
//! `run.rs` calls once per discovered file.

use std::path::Path;

use tython_parser::Dialect;

use crate::error::TythonError;

pub struct Translated {
    pub source: String,
    pub ast_debug: String,
}

pub fn translate_file(
    file: &Path,
    contents: &str,
    dialect: Dialect,
    grammar_dir: &Path,
    convert_snake_case: bool,
) -> Result<Translated, TythonError> {
    let tree = tython_parser::parse(contents, dialect, grammar_dir).map_err(|e| TythonError::Config(e.to_string()))?;
    let root = tree.ok().map_err(|parse_err| TythonError::Parse {
        file: file.to_path_buf(),
        line: parse_err.line,
        col: parse_err.col,
        message: parse_err.message.clone(),
    })?;

    let translated = tython_transform::translate_program(&root, convert_snake_case).map_err(|source| TythonError::Transform {
        file: file.to_path_buf(),
        source,
    })?;

    let orphaned = translated.orphaned_hoists();
    if !orphaned.is_empty() {
        return Err(TythonError::IncompleteHoisting {
            file: file.to_path_buf(),
            count: orphaned.len(),
        });
    }

    let ast_debug = format!("{:#?}", translated.get(translated.module));
    let rendered = tython_encoder::serialize(&translated.arena, translated.module);
    let source = tython_postprocess::postprocess(&rendered);

    Ok(Translated { source, ast_debug })
}
