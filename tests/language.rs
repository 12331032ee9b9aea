use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use volt::{Error, run_captured};
use walkdir::WalkDir;

#[test]
fn demo_scripts_match_their_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").sort_by_file_name()
                             .into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "volt"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = expected_output(path);

        count += 1;
        match run_captured(&source) {
            Ok(actual) => assert_eq!(actual, expected, "output of {path:?}"),
            Err(e) => panic!("Demo {path:?} failed:\n{e}"),
        }
    }

    assert!(count > 0, "No demo scripts found in demos/");
}

fn expected_output(script: &Path) -> String {
    let path = script.with_extension("out");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Missing expected output {path:?}: {e}"))
}

fn assert_success(src: &str) {
    if let Err(e) = run_captured(src) {
        panic!("Script failed: {e}");
    }
}

fn assert_parse_failure(src: &str) {
    match run_captured(src) {
        Err(Error::Parse(_)) => {},
        other => panic!("Expected a parse error, got {other:?}"),
    }
}

fn assert_runtime_failure(src: &str) {
    match run_captured(src) {
        Err(Error::Runtime(_)) => {},
        other => panic!("Expected a runtime error, got {other:?}"),
    }
}

#[test]
fn declarations_and_assignment() {
    assert_success("let x; print x;");
    assert_success("let x = 1; x = x + 1;");
    assert_success("let a = [0]; a[0] = a[0] + 1;");
}

#[test]
fn control_flow_forms() {
    assert_success("if (1 < 2) print 1; else print 2;");
    assert_success("let i = 0; while (i < 3) i++;");
    assert_success("for (;;) { break; }");
    assert_success("let i = 0; run i++; until (i == 2);");
}

#[test]
fn functions_and_closures() {
    assert_success("fn f(a, b) { return a * b; } print f(2, 3);");
    assert_success("let f = fn (x) { return fn (y) { return x + y; }; }; print f(1)(2);");
}

#[test]
fn syntax_errors() {
    assert_parse_failure("let 1 = x;");
    assert_parse_failure("print (1 + 2;");
    assert_parse_failure("fn (a) { }");
    assert_parse_failure("if 1 < 2 print 1;");
    assert_parse_failure("x++ = 1;");
    assert_parse_failure("let s = \"unterminated;");
}

#[test]
fn runtime_failures() {
    assert_runtime_failure("print 1 / 0;");
    assert_runtime_failure("print undefined_name;");
    assert_runtime_failure("print true + 1;");
    assert_runtime_failure("print [1][1];");
    assert_runtime_failure("print len(1);");
    assert_runtime_failure("print sqrt(-1);");
    assert_runtime_failure("let m = {}; print m[[1]];");
}
