use crate::ast::*;
use crate::error::{SlnError, WriterError};
use log::debug;
use std::fmt::{self, Write};

const INDENT: char = '\t';

/// Writes a [`SolutionFile`] back out as `.sln` text.
///
/// The walk mirrors the parser's grammar. Every line is prefixed with one tab per
/// nesting level and followed by the line ending, so the output always ends with
/// exactly one terminator after `EndGlobal`.
pub struct SolutionWriter<'w, W: Write> {
    out: &'w mut W,
    indent_level: usize,
    line_ending: &'static str,
}

impl<'w, W: Write> SolutionWriter<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self::with_line_ending(out, "\n")
    }

    pub fn with_line_ending(out: &'w mut W, line_ending: &'static str) -> Self {
        Self {
            out,
            indent_level: 0,
            line_ending,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_line(&mut self, line: &str) -> fmt::Result {
        if !line.is_empty() {
            for _ in 0..self.indent_level {
                self.out.write_char(INDENT)?;
            }
        }
        self.out.write_str(line)?;
        self.out.write_str(self.line_ending)
    }

    pub fn write_document(&mut self, solution: &SolutionFile) -> fmt::Result {
        self.write_line("")?;
        self.write_header(solution)?;
        for project in &solution.project_references {
            self.write_project(project)?;
        }
        self.write_global(&solution.global_sections)?;
        debug!(
            "wrote {} project reference(s) and {} global section(s)",
            solution.project_references.len(),
            solution.global_sections.len()
        );
        Ok(())
    }

    fn write_header(&mut self, solution: &SolutionFile) -> fmt::Result {
        let format = solution.format_version;
        self.write_line(&format!(
            "Microsoft Visual Studio Solution File, Format Version {}.{:02}",
            format.major, format.minor
        ))?;
        self.write_line(&solution.visual_studio_moniker)?;
        self.write_line(&format!(
            "VisualStudioVersion = {}",
            solution.visual_studio_version
        ))?;
        self.write_line(&format!(
            "MinimumVisualStudioVersion = {}",
            solution.minimum_visual_studio_version
        ))
    }

    fn write_project(&mut self, project: &ProjectReference) -> fmt::Result {
        self.write_line(&format!(
            "Project(\"{}\") = \"{}\", \"{}\", \"{}\"",
            fmt_guid(&project.project_type_guid),
            project.project_name,
            project.project_file_relative_path,
            fmt_guid(&project.project_guid)
        ))?;

        self.indent();
        for section in &project.sections {
            self.write_line(&format!(
                "ProjectSection({}) = {}",
                section.name, section.pre_or_post_project
            ))?;
            self.indent();
            for line in &section.lines {
                self.write_line(line)?;
            }
            self.dedent();
            self.write_line("EndProjectSection")?;
        }
        self.dedent();

        self.write_line("EndProject")
    }

    fn write_global(&mut self, sections: &[GlobalSection]) -> fmt::Result {
        self.write_line("Global")?;
        self.indent();
        for section in sections {
            self.write_global_section(section)?;
        }
        self.dedent();
        self.write_line("EndGlobal")
    }

    fn write_global_section(&mut self, section: &GlobalSection) -> fmt::Result {
        self.write_line(&format!(
            "GlobalSection({}) = {}",
            section.name, section.pre_or_post_solution
        ))?;

        self.indent();
        match &section.content {
            SectionContent::General(lines) => {
                for line in lines {
                    self.write_line(line)?;
                }
            }
            SectionContent::NestedProjects(nestings) => {
                for nesting in nestings {
                    self.write_line(&nesting.to_string())?;
                }
            }
        }
        self.dedent();

        self.write_line("EndGlobalSection")
    }
}

/// Renders the solution as `.sln` text with `\n` line endings.
pub fn to_sln_string(solution: &SolutionFile) -> Result<String, SlnError> {
    to_sln_string_with(solution, "\n")
}

pub fn to_sln_string_with(
    solution: &SolutionFile,
    line_ending: &'static str,
) -> Result<String, SlnError> {
    let mut buffer = String::new();
    SolutionWriter::with_line_ending(&mut buffer, line_ending)
        .write_document(solution)
        .map_err(WriterError::from)?;
    Ok(buffer)
}

/// Renders the solution as a sequence of lines without terminators.
/// Appending a terminator to each line reproduces [`to_sln_string`].
pub fn to_lines(solution: &SolutionFile) -> Result<Vec<String>, SlnError> {
    Ok(to_sln_string(solution)?
        .lines()
        .map(str::to_string)
        .collect())
}
