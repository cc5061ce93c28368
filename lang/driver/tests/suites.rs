//! Runs the file based test suites under `test/suites`
//!
//! Every case states its expectations in leading comments:
//!
//! - `-- error: CODE`: compilation fails with the diagnostic code `CODE`
//! - `-- warning: CODE`: compilation emits a warning with code `CODE`
//! - `-- assert: LHS == RHS`: both expressions have the same normal form

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use walkdir::WalkDir;

use eqc_lang_driver::{Database, render_reports_to_string};
use eqc_lang_printer::ColorChoice;

const TEST_SUITES_PATH: &str = "../../test/suites";

fn cases(suite: &str) -> Vec<PathBuf> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(TEST_SUITES_PATH).join(suite);
    let mut cases: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| {
            entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new("eqc"))
        })
        .map(|entry| entry.into_path())
        .collect();
    cases.sort();
    assert!(!cases.is_empty(), "No cases found in suite {suite}");
    cases
}

fn directives(source: &str, key: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| line.strip_prefix("-- "))
        .filter_map(|line| line.strip_prefix(key))
        .filter_map(|line| line.strip_prefix(':'))
        .map(|value| value.trim().to_owned())
        .collect()
}

fn code(diagnostic: &dyn Diagnostic) -> String {
    diagnostic.code().map(|code| code.to_string()).unwrap_or_default()
}

#[test]
fn success() {
    for path in cases("success") {
        let source = fs::read_to_string(&path).unwrap();
        let mut db = Database::from_source(path.display().to_string(), source.clone());
        let compiled = match db.compiled() {
            Ok(compiled) => compiled,
            Err(err) => {
                let report = render_reports_to_string(&[db.pretty_error(err)], ColorChoice::Never);
                panic!("{} failed to compile:\n{report}", path.display());
            }
        };

        let mut warnings: Vec<String> =
            compiled.warnings().map(|warning| code(warning)).collect();
        warnings.sort();
        let mut expected = directives(&source, "warning");
        expected.sort();
        assert_eq!(warnings, expected, "Warnings of {}", path.display());

        for assertion in directives(&source, "assert") {
            let (lhs, rhs) = assertion.split_once("==").unwrap();
            let lhs = db.normalize(lhs.trim()).unwrap();
            let rhs = db.normalize(rhs.trim()).unwrap();
            assert_eq!(lhs, rhs, "{}: {assertion}", path.display());
        }
    }
}

#[test]
fn fail() {
    for path in cases("fail") {
        let source = fs::read_to_string(&path).unwrap();
        let expected = directives(&source, "error");
        assert_eq!(expected.len(), 1, "{} must state exactly one error", path.display());
        let mut db = Database::from_source(path.display().to_string(), source);
        match db.compiled() {
            Ok(_) => panic!("{} compiled, but should fail with {}", path.display(), expected[0]),
            Err(err) => assert_eq!(code(&err), expected[0], "{}", path.display()),
        }
    }
}
