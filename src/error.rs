use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SlnError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Writer(#[from] WriterError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(sln::io))]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Malformed header: expected {expected}, found `{found}`")]
    #[diagnostic(
        code(parser::malformed_header),
        help("A solution file starts with a blank line, the format version line, the moniker line, and the two Visual Studio version lines.")
    )]
    MalformedHeader {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected} here")]
        span: SourceSpan,
        expected: String,
        found: String,
    },

    #[error("Malformed line: expected {expected}, found `{found}`")]
    #[diagnostic(
        code(parser::malformed_line),
        help("The line does not have the shape its position in the file requires.")
    )]
    MalformedLine {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected}, but found this")]
        span: SourceSpan,
        expected: String,
        found: String,
    },

    #[error("Unterminated project: expected EndProject, found `{found}`")]
    #[diagnostic(
        code(parser::unterminated_project),
        help("Every `Project(...)` line must be closed by `EndProject`.")
    )]
    UnterminatedProject {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected EndProject here")]
        span: SourceSpan,
        found: String,
    },

    #[error("Missing global block: expected Global, found `{found}`")]
    #[diagnostic(
        code(parser::missing_global_block),
        help("The project list must be followed by a `Global` ... `EndGlobal` block.")
    )]
    MissingGlobalBlock {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected Global here")]
        span: SourceSpan,
        found: String,
    },

    #[error("Malformed nesting line: `{found}`")]
    #[diagnostic(
        code(parser::malformed_nesting_line),
        help("NestedProjects entries have the form `{{CHILD-GUID}} = {{PARENT-GUID}}`.")
    )]
    MalformedNestingLine {
        #[source_code]
        src: NamedSource<String>,
        #[label("Could not split this into a child and parent GUID")]
        span: SourceSpan,
        found: String,
    },

    #[error("Trailing content after EndGlobal: `{found}`")]
    #[diagnostic(
        code(parser::trailing_content),
        help("Nothing but a single blank line may follow `EndGlobal`.")
    )]
    TrailingContent {
        #[source_code]
        src: NamedSource<String>,
        #[label("Unexpected content")]
        span: SourceSpan,
        found: String,
    },

    #[error("Unexpected end of file: expected {expected}")]
    #[diagnostic(
        code(parser::unexpected_eof),
        help("The file ended before the solution grammar was complete.")
    )]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<String>,
        #[label("File ended unexpectedly here")]
        span: SourceSpan,
        expected: String,
    },
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum WriterError {
    #[error("Failed to write solution text")]
    #[diagnostic(code(writer::fmt))]
    Fmt(#[from] std::fmt::Error),
}
