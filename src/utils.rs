/// The UTF-8 byte order mark Visual Studio writes at the start of solution files.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// A single physical line of the source, without its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    /// Byte offset of the first character of `text` in the source.
    pub offset: usize,
}

/// Splits source text into lines, accepting both `\n` and `\r\n` terminators.
/// A final terminator yields a trailing empty line, so `"a\n"` becomes `["a", ""]`.
pub fn split_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in source.split('\n') {
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        lines.push(SourceLine { text, offset });
        offset += raw.len() + 1;
    }
    lines
}

/// Removes a leading byte order mark, if present.
pub fn strip_bom(source: &str) -> &str {
    source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source)
}
