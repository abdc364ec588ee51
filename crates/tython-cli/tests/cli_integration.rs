//! End-to-end test of the CLI pipeline: discovery, translation and
//! output-layout, driven through `run::run_with_grammar_dir` against a
//! temp directory so it doesn't depend on the test runner's cwd.

use std::path::PathBuf;

use tython_cli::cli::{Cli, DialectArg};
use tython_cli::run::run_with_grammar_dir;

fn grammar_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../grammar")
}

#[test]
fn translates_a_small_ts_file_and_writes_snake_cased_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input_dir = tmp.path().join("widgets");
    std::fs::create_dir_all(&input_dir).unwrap();
    std::fs::write(input_dir.join("MyWidget.ts"), "let x = 1;\n").unwrap();

    let output_dir = tmp.path().join("out");

    let cli = Cli {
        input: tmp.path().to_path_buf(),
        output: output_dir.clone(),
        dialect: DialectArg::Ts,
        debug: false,
        cores: Some(1),
        convert_snake_case: true,
    };

    let report = run_with_grammar_dir(&cli, &grammar_dir()).expect("run should succeed");
    assert_eq!(report.total, 1);
    assert!(report.failed.is_empty(), "unexpected failures: {:?}", report.failed.iter().map(|(_, e)| e.to_string()).collect::<Vec<_>>());

    let out_file = output_dir.join("widgets/my_widget.py");
    assert!(out_file.exists(), "expected {} to exist", out_file.display());
    let contents = std::fs::read_to_string(out_file).unwrap();
    assert_eq!(contents, "x = 1\n");
}

#[test]
fn spec_files_are_excluded_from_discovery() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("real.ts"), "let x = 1;\n").unwrap();
    std::fs::write(tmp.path().join("real.spec.ts"), "let y = 2;\n").unwrap();

    let output_dir = tmp.path().join("out");
    let cli = Cli {
        input: tmp.path().to_path_buf(),
        output: output_dir,
        dialect: DialectArg::Ts,
        debug: false,
        cores: Some(1),
        convert_snake_case: false,
    };

    let report = run_with_grammar_dir(&cli, &grammar_dir()).unwrap();
    assert_eq!(report.total, 1);
}

#[test]
fn missing_input_path_is_a_config_error() {
    let cli = Cli {
        input: PathBuf::from("/this/path/does/not/exist/anywhere"),
        output: PathBuf::from("/tmp/tython-out-does-not-matter"),
        dialect: DialectArg::Ts,
        debug: false,
        cores: Some(1),
        convert_snake_case: false,
    };

    let err = run_with_grammar_dir(&cli, &grammar_dir()).expect_err("missing input should fail");
    assert!(matches!(err, tython_cli::error::TythonError::Config(_)));
}
