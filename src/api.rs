use crate::ast::SolutionFile;
use crate::error::SlnError;
use crate::parser::Parser;
use crate::writer::{to_lines, to_sln_string};

/// Parses `.sln` text into a [`SolutionFile`].
///
/// This is the primary entry point. Either the whole document parses, or the first
/// violated expectation is returned with the offending line attached for diagnostics.
///
/// # Errors
///
/// Returns a `SlnError::Parser` describing the expected marker and the line found.
pub fn parse(source: &str) -> Result<SolutionFile, SlnError> {
    parse_named(source, "source.sln")
}

/// Like [`parse`], but names the source in diagnostics.
///
/// # Errors
///
/// Returns a `SlnError::Parser` if the text does not follow the solution grammar.
pub fn parse_named(source: &str, file_name: &str) -> Result<SolutionFile, SlnError> {
    Parser::new_with_name(source, file_name.to_string()).parse_document()
}

/// Parses a sequence of lines, each without its terminator.
///
/// # Errors
///
/// Returns a `SlnError::Parser` if the lines do not follow the solution grammar.
pub fn parse_lines<I, S>(lines: I) -> Result<SolutionFile, SlnError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut source = String::new();
    for line in lines {
        source.push_str(line.as_ref());
        source.push('\n');
    }
    parse(&source)
}

/// Serializes a [`SolutionFile`] to `.sln` text with `\n` line endings.
///
/// # Errors
///
/// Returns a `SlnError::Writer` if the text sink fails.
pub fn write(solution: &SolutionFile) -> Result<String, SlnError> {
    to_sln_string(solution)
}

/// Serializes a [`SolutionFile`] to lines without terminators.
///
/// # Errors
///
/// Returns a `SlnError::Writer` if the text sink fails.
pub fn write_lines(solution: &SolutionFile) -> Result<Vec<String>, SlnError> {
    to_lines(solution)
}

impl SolutionFile {
    /// Serializes the document model into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the document model into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
