/// The kinds of lines the solution grammar distinguishes.
/// Classification works on a trimmed line and looks only at its leading keyword.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LineKind {
    // == Structure ==
    /// A line holding nothing but whitespace.
    Blank,
    /// `Project("{TYPE}") = "Name", "Path", "{GUID}"`
    Project,
    /// `EndProject`
    EndProject,
    /// `ProjectSection(Name) = preProject`, only valid inside a project entry.
    ProjectSection,
    /// `EndProjectSection`
    EndProjectSection,
    /// `Global`
    Global,
    /// `EndGlobal`. An identifier that merely starts with `EndGlobal` is not this.
    EndGlobal,
    /// `GlobalSection(Name) = preSolution`
    GlobalSection,
    /// `EndGlobalSection`
    EndGlobalSection,

    // == Everything else ==
    /// Header lines and section content.
    Other,
}

impl LineKind {
    /// The marker text used in diagnostics.
    pub fn marker(self) -> &'static str {
        match self {
            LineKind::Blank => "a blank line",
            LineKind::Project => "Project",
            LineKind::EndProject => "EndProject",
            LineKind::ProjectSection => "ProjectSection",
            LineKind::EndProjectSection => "EndProjectSection",
            LineKind::Global => "Global",
            LineKind::EndGlobal => "EndGlobal",
            LineKind::GlobalSection => "GlobalSection",
            LineKind::EndGlobalSection => "EndGlobalSection",
            LineKind::Other => "a content line",
        }
    }
}

// Keywords that share a prefix with a longer one (`EndGlobal` / `EndGlobalSection`,
// `Project` / `ProjectSection`) are checked longest first.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();
    if line.is_empty() {
        LineKind::Blank
    } else if is_end_global_section_line(line) {
        LineKind::EndGlobalSection
    } else if is_end_global_line(line) {
        LineKind::EndGlobal
    } else if is_global_section_line(line) {
        LineKind::GlobalSection
    } else if is_global_line(line) {
        LineKind::Global
    } else if is_end_project_section_line(line) {
        LineKind::EndProjectSection
    } else if is_end_project_line(line) {
        LineKind::EndProject
    } else if is_project_section_line(line) {
        LineKind::ProjectSection
    } else if is_project_line(line) {
        LineKind::Project
    } else {
        LineKind::Other
    }
}

/// True when `line` is `keyword` alone or `keyword` followed by whitespace.
fn is_keyword_line(line: &str, keyword: &str) -> bool {
    match line.strip_prefix(keyword) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

pub fn is_project_line(line: &str) -> bool {
    line.starts_with("Project") && !is_project_section_line(line)
}

pub fn is_end_project_line(line: &str) -> bool {
    line.starts_with("EndProject") && !is_end_project_section_line(line)
}

pub fn is_project_section_line(line: &str) -> bool {
    line.starts_with("ProjectSection")
}

pub fn is_end_project_section_line(line: &str) -> bool {
    line.starts_with("EndProjectSection")
}

pub fn is_global_line(line: &str) -> bool {
    is_keyword_line(line, "Global")
}

pub fn is_end_global_line(line: &str) -> bool {
    is_keyword_line(line, "EndGlobal")
}

pub fn is_global_section_line(line: &str) -> bool {
    line.starts_with("GlobalSection")
}

pub fn is_end_global_section_line(line: &str) -> bool {
    line.starts_with("EndGlobalSection")
}

/// The four quoted values of a `Project(...)` line, quotes stripped, in file order:
/// type GUID, name, relative path, project GUID.
///
/// Returns `None` unless the line holds exactly four quoted values.
pub fn project_line_values(line: &str) -> Option<[&str; 4]> {
    if line.matches('"').count() != 8 {
        return None;
    }
    // Quoted values sit at the odd positions between quote characters.
    let mut quoted = line.split('"').skip(1).step_by(2);
    Some([quoted.next()?, quoted.next()?, quoted.next()?, quoted.next()?])
}

/// Name and scope token of a `GlobalSection(Name) = scope` line.
pub fn global_section_values(line: &str) -> Option<(&str, &str)> {
    section_header_values(line, "GlobalSection")
}

/// Name and scope token of a `ProjectSection(Name) = scope` line.
pub fn project_section_values(line: &str) -> Option<(&str, &str)> {
    section_header_values(line, "ProjectSection")
}

fn section_header_values<'a>(line: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let rest = line.trim().strip_prefix(keyword)?.trim_start().strip_prefix('(')?;
    // Names may hold `=` or parentheses; the scope follows the last `)`.
    let close = rest.rfind(')')?;
    let name = &rest[..close];
    let scope = rest[close + 1..].trim_start().strip_prefix('=')?.trim();
    if name.is_empty() || scope.is_empty() {
        return None;
    }
    Some((name, scope))
}

/// Child and parent GUID text of a `{child} = {parent}` line.
pub fn nesting_values(line: &str) -> Option<(&str, &str)> {
    let (child, parent) = line.split_once('=')?;
    let (child, parent) = (child.trim(), parent.trim());
    if child.is_empty() || parent.is_empty() || parent.contains('=') {
        return None;
    }
    Some((child, parent))
}

/// The last whitespace-delimited token, which is where header lines keep their value.
pub fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}
