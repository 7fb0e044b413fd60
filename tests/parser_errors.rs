// Parser error path tests
// Each fixture in tests/err breaks exactly one rule of the grammar.

use sln_core::error::{ParserError, SlnError};
use sln_core::parse;
use std::fs;
use std::path::PathBuf;

fn read_err_fixture(filename: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("err")
        .join(filename);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read test file: {:?}", path))
}

fn parser_error(source: &str) -> ParserError {
    match parse(source) {
        Err(SlnError::Parser(err)) => err,
        Err(other) => panic!("Expected parser error, got {other:?}"),
        Ok(_) => panic!("Expected parse to fail"),
    }
}

const HEADER: &str = "\nMicrosoft Visual Studio Solution File, Format Version 12.00\n# Visual Studio 15\nVisualStudioVersion = 15.0.26124.0\nMinimumVisualStudioVersion = 15.0.26124.0\n";

#[test]
fn test_parser_error_missing_end_project() {
    let err = parser_error(&read_err_fixture("missing_end_project.sln"));
    assert!(matches!(err, ParserError::UnterminatedProject { .. }), "{err:?}");
}

#[test]
fn test_parser_error_truncated_after_project() {
    let source = format!(
        "{HEADER}Project(\"{{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}}\") = \"App\", \"App.csproj\", \"{{9DAD5F24-3C22-47C9-8D69-3C7D72C62DAD}}\""
    );
    let err = parser_error(&source);
    assert!(
        matches!(err, ParserError::UnterminatedProject { ref found, .. } if found == "end of file"),
        "{err:?}"
    );
}

#[test]
fn test_parser_error_missing_global() {
    let err = parser_error(&read_err_fixture("missing_global.sln"));
    assert!(matches!(err, ParserError::MissingGlobalBlock { .. }), "{err:?}");
}

#[test]
fn test_parser_error_bad_nesting_line() {
    let err = parser_error(&read_err_fixture("bad_nesting.sln"));
    assert!(matches!(err, ParserError::MalformedNestingLine { .. }), "{err:?}");
}

#[test]
fn test_parser_error_nesting_with_invalid_guid() {
    let source = format!(
        "{HEADER}Global\n\tGlobalSection(NestedProjects) = preSolution\n\t\t{{A}} = {{B}}\n\tEndGlobalSection\nEndGlobal\n"
    );
    let err = parser_error(&source);
    assert!(matches!(err, ParserError::MalformedNestingLine { .. }), "{err:?}");
}

#[test]
fn test_parser_error_trailing_content() {
    let err = parser_error(&read_err_fixture("trailing_content.sln"));
    assert!(
        matches!(err, ParserError::TrailingContent { ref found, .. } if found == "# stray comment"),
        "{err:?}"
    );
}

#[test]
fn test_parser_error_bad_header() {
    let err = parser_error(&read_err_fixture("bad_header.sln"));
    assert!(
        matches!(err, ParserError::MalformedHeader { ref found, .. } if found == "VisualStudioVersion = fifteen"),
        "{err:?}"
    );
}

#[test]
fn test_parser_error_project_with_three_values() {
    let source = format!(
        "{HEADER}Project(\"{{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}}\") = \"App\", \"App.csproj\"\nEndProject\nGlobal\nEndGlobal\n"
    );
    let err = parser_error(&source);
    assert!(matches!(err, ParserError::MalformedLine { .. }), "{err:?}");
}

#[test]
fn test_parser_error_stray_line_in_global() {
    let err = parser_error(&format!("{HEADER}Global\n\tHideSolutionNode = FALSE\nEndGlobal\n"));
    match err {
        ParserError::MalformedLine { expected, found, .. } => {
            assert_eq!(expected, "GlobalSection or EndGlobal");
            assert_eq!(found, "HideSolutionNode = FALSE");
        }
        other => panic!("Expected malformed line, got {other:?}"),
    }
}

#[test]
fn test_parser_error_missing_end_global() {
    let err = parser_error(&format!("{HEADER}Global\n"));
    // The final newline leaves one blank line, which is not a section either.
    assert!(matches!(err, ParserError::MalformedLine { .. }), "{err:?}");

    let err = parser_error(&format!("{HEADER}Global"));
    assert!(matches!(err, ParserError::UnexpectedEof { .. }), "{err:?}");
}

#[test]
fn test_parser_error_empty_input() {
    let err = parser_error("");
    assert!(matches!(err, ParserError::UnexpectedEof { .. } | ParserError::MalformedHeader { .. }));
}

#[test]
fn test_parser_error_renders_diagnostic() {
    let err = parse(&read_err_fixture("missing_global.sln")).unwrap_err();
    let rendered = format!("{:?}", miette::Report::new(err));
    assert!(rendered.contains("parser::missing_global_block"), "{rendered}");
}
