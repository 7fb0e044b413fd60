use crate::ast::SolutionFile;
use crate::error::SlnError;
use crate::parser::Parser;
use crate::utils::BYTE_ORDER_MARK;
use crate::writer::to_sln_string_with;
use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// How [`save`] lays out bytes on disk. The default matches what Visual Studio writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    pub line_ending: LineEnding,
    pub byte_order_mark: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::CrLf,
            byte_order_mark: true,
        }
    }
}

/// Reads and parses a solution file. A leading byte order mark is ignored.
///
/// # Errors
///
/// Returns `SlnError::Io` if the file cannot be read, or `SlnError::Parser` if it is
/// not a well-formed solution.
pub fn load(path: impl AsRef<Path>) -> Result<SolutionFile, SlnError> {
    let path = path.as_ref();
    debug!("loading solution from {}", path.display());
    let source = fs::read_to_string(path)?;
    Parser::new_with_name(&source, path.display().to_string()).parse_document()
}

/// Writes a solution file, replacing `path` atomically.
///
/// # Errors
///
/// Returns `SlnError::Io` if the temporary file cannot be written or moved into place.
pub fn save(
    path: impl AsRef<Path>,
    solution: &SolutionFile,
    options: &SaveOptions,
) -> Result<(), SlnError> {
    let path = path.as_ref();
    debug!(
        "saving solution to {} ({:?}, bom: {})",
        path.display(),
        options.line_ending,
        options.byte_order_mark
    );

    let mut text = String::new();
    if options.byte_order_mark {
        text.push(BYTE_ORDER_MARK);
    }
    text.push_str(&to_sln_string_with(solution, options.line_ending.as_str())?);

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
