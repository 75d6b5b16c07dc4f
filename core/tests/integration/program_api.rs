use std::io::Cursor;

use assert_matches::assert_matches;
use tinfer_core::{
    error::{report::ErrorFormat, Error, ParseError, TypecheckError},
    program::Program,
    term::Term,
};

fn program(source: &str) -> Program {
    Program::new_from_source(Cursor::new(source.to_owned()), "<program>").unwrap()
}

#[test]
fn parse_then_infer() {
    let program = program("(letrec ((f (lambda ((n : number)) : number n))) (f 1))");

    assert_matches!(program.parse().unwrap().as_ref(), Term::Letrec(_));
    assert_eq!(program.infer().unwrap().to_string(), "number");
}

#[test]
fn errors_keep_their_phase() {
    assert_matches!(
        program("(let ((x)) x)").infer(),
        Err(Error::ParseError(ParseError::MalformedExpression { .. }))
    );
    assert_matches!(
        program("(f 1)").infer(),
        Err(Error::TypecheckError(TypecheckError::UnboundIdentifier { .. }))
    );
}

#[test]
fn json_report_of_aggregate_error() {
    let mut program = program("(+ \"one\" #t)");
    let error = program.infer().unwrap_err();
    let report = program.report_to_string(error, ErrorFormat::Json).unwrap();

    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    // One diagnostic for the aggregate, then one per failure.
    assert_eq!(value["diagnostics"].as_array().map(Vec::len), Some(3));
}

#[test]
fn text_report_points_at_the_source() {
    let mut program = program("(if #t 1 \"a\")");
    let error = program.infer().unwrap_err();
    let report = program.report_to_string(error, ErrorFormat::Text).unwrap();

    assert!(report.contains("<program>:1:1"), "{report}");
    assert!(report.contains("expected `number`, found `string`"), "{report}");
}
