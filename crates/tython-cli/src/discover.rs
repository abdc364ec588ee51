//! File discovery: walks `--input` with `walkdir` and applies the per-
//! dialect inclusion/exclusion rules from spec.md §6, plus the output path
//! layout rule.

use std::path::{Path, PathBuf};

use tython_parser::Dialect;
use walkdir::WalkDir;

use crate::error::TythonError;

/// Collects every source file under `input` (or `input` itself, if it is
/// a file) that `is_included` accepts for `dialect`. Order is whatever
/// `walkdir` yields — the worker pool doesn't care.
pub fn discover(input: &Path, dialect: Dialect) -> Result<Vec<PathBuf>, TythonError> {
    if !input.exists() {
        return Err(TythonError::Config(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    if input.is_file() {
        return Ok(if is_included(input, dialect) { vec![input.to_path_buf()] } else { vec![] });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = entry.map_err(|e| TythonError::Io {
            file: input.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        })?;
        if entry.file_type().is_file() && is_included(entry.path(), dialect) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn is_included(path: &Path, dialect: Dialect) -> bool {
    match dialect {
        Dialect::Ts => {
            let ends_ts = path.extension().is_some_and(|ext| ext == "ts");
            let is_spec = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(".spec.ts"));
            let has_index_component = path.components().any(|c| c.as_os_str() == "index");
            ends_ts && !is_spec && !has_index_component
        }
        Dialect::Js => {
            let ends_js = path.extension().is_some_and(|ext| ext == "js");
            let is_spec = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(".spec.js"));
            let path_str = path.to_string_lossy();
            let contains_index = path_str.contains("index");
            let has_types_component = path.components().any(|c| c.as_os_str() == "types");
            ends_js && !is_spec && !contains_index && !has_types_component
        }
    }
}

/// `<output_root>/<maybe_snake(relative/path)>/<maybe_snake(name)>.py` for
/// an input found under `input_root` (spec.md §6's output layout rule).
pub fn output_path_for(
    input_root: &Path,
    file: &Path,
    output_root: &Path,
    convert_snake_case: bool,
) -> PathBuf {
    let relative = file.strip_prefix(input_root).unwrap_or(file);
    let mut out = output_root.to_path_buf();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            let piece = component.as_os_str().to_string_lossy();
            out.push(maybe_snake(&piece, convert_snake_case));
        }
    }
    let stem = relative.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    out.push(format!("{}.py", maybe_snake(&stem, convert_snake_case)));
    out
}

fn maybe_snake(piece: &str, convert_snake_case: bool) -> String {
    if convert_snake_case {
        tython_pyast::to_snake_case(piece)
    } else {
        piece.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ts_excludes_spec_and_index() {
        assert!(is_included(Path::new("src/foo.ts"), Dialect::Ts));
        assert!(!is_included(Path::new("src/foo.spec.ts"), Dialect::Ts));
        assert!(!is_included(Path::new("src/index/foo.ts"), Dialect::Ts));
        assert!(!is_included(Path::new("src/foo.js"), Dialect::Ts));
    }

    #[test]
    fn js_excludes_spec_index_substring_and_types_dir() {
        assert!(is_included(Path::new("src/foo.js"), Dialect::Js));
        assert!(!is_included(Path::new("src/foo.spec.js"), Dialect::Js));
        assert!(!is_included(Path::new("src/indexer.js"), Dialect::Js));
        assert!(!is_included(Path::new("src/types/foo.js"), Dialect::Js));
    }

    #[test]
    fn output_layout_preserves_relative_directories() {
        let out = output_path_for(
            Path::new("/in"),
            Path::new("/in/widgets/MyWidget.ts"),
            Path::new("/out"),
            false,
        );
        assert_eq!(out, Path::new("/out/widgets/MyWidget.py"));
    }

    #[test]
    fn output_layout_snake_cases_when_requested() {
        let out = output_path_for(
            Path::new("/in"),
            Path::new("/in/MyWidgets/MyWidget.ts"),
            Path::new("/out"),
            true,
        );
        assert_eq!(out, Path::new("/out/my_widgets/my_widget.py"));
    }
}
