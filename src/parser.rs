use crate::ast::*;
use crate::error::{ParserError, SlnError};
use crate::lexer::{self, LineKind};
use crate::utils::{split_lines, strip_bom, SourceLine};
use log::{debug, trace};
use miette::{NamedSource, SourceSpan};
use std::panic::Location;
use uuid::Uuid;

const FORMAT_VERSION_PREFIX: &str = "Microsoft Visual Studio Solution File, Format Version";
const VISUAL_STUDIO_VERSION_KEY: &str = "VisualStudioVersion";
const MINIMUM_VISUAL_STUDIO_VERSION_KEY: &str = "MinimumVisualStudioVersion";

/// A single-pass, line-oriented parser for `.sln` files.
///
/// The grammar is a small state machine:
///
/// ```text
/// document ::= "" header project* "Global" section* "EndGlobal" ""
/// ```
///
/// Each state consumes the lines it recognizes and leaves the first line it does not
/// for the next state, so there is exactly one line of lookahead and no backtracking.
#[derive(Debug)]
pub struct Parser<'a> {
    source: NamedSource<String>,
    lines: Vec<SourceLine<'a>>,
    position: usize,
    source_text: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, "source.sln".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        let source_text = strip_bom(source_text);
        Self {
            source: NamedSource::new(name, source_text.to_string()),
            lines: split_lines(source_text),
            position: 0,
            source_text,
        }
    }

    // === Grammar States ===

    /// document ::= "" header project* "Global" section* "EndGlobal" ""
    pub fn parse_document(&mut self) -> Result<SolutionFile, SlnError> {
        let mut solution = self.parse_header()?;

        while self.check(LineKind::Project) {
            let project = self.parse_project()?;
            solution.project_references.push(project);
        }
        debug!(
            "parsed {} project reference(s)",
            solution.project_references.len()
        );

        solution.global_sections = self.parse_global()?;
        debug!(
            "parsed {} global section(s)",
            solution.global_sections.len()
        );

        self.parse_trailer()?;
        Ok(solution)
    }

    /// header ::= "" versionLine monikerLine vsVersionLine vsMinVersionLine
    fn parse_header(&mut self) -> Result<SolutionFile, SlnError> {
        let blank = self.next_line("a leading blank line")?;
        if !blank.text.trim().is_empty() {
            return self.err_header(blank, "a leading blank line");
        }

        let format_line = self.next_line("the format version line")?;
        let format_version = if format_line.text.trim().starts_with(FORMAT_VERSION_PREFIX) {
            self.header_version(format_line, "the format version line")?
        } else {
            return self.err_header(format_line, "the format version line");
        };
        // The writer only emits `major.minor`.
        if format_version.build.is_some() {
            return self.err_header(format_line, "a two-component format version");
        }

        let moniker_line = self.next_line("the Visual Studio moniker line")?;
        if !moniker_line.text.trim_start().starts_with('#') {
            return self.err_header(moniker_line, "the Visual Studio moniker line");
        }

        let visual_studio_version = self.parse_version_assignment(VISUAL_STUDIO_VERSION_KEY)?;
        let minimum_visual_studio_version =
            self.parse_version_assignment(MINIMUM_VISUAL_STUDIO_VERSION_KEY)?;

        debug!(
            "parsed header: format version {}, Visual Studio {}",
            format_version, visual_studio_version
        );

        Ok(SolutionFile {
            format_version,
            visual_studio_moniker: moniker_line.text.to_string(),
            visual_studio_version,
            minimum_visual_studio_version,
            project_references: Vec::new(),
            global_sections: Vec::new(),
        })
    }

    /// vsVersionLine ::= KEY " = " VERSION
    fn parse_version_assignment(&mut self, key: &str) -> Result<Version, SlnError> {
        let expected = format!("`{key} = <version>`");
        let line = self.next_line(&expected)?;
        match line.text.trim().split_once('=') {
            Some((lhs, _)) if lhs.trim() == key => self.header_version(line, &expected),
            _ => self.err_header(line, &expected),
        }
    }

    fn header_version(&self, line: SourceLine<'a>, expected: &str) -> Result<Version, SlnError> {
        lexer::last_token(line.text)
            .and_then(|token| token.parse::<Version>().ok())
            .map_or_else(|| self.err_header(line, expected), Ok)
    }

    /// project ::= 'Project("' TYPEGUID '") = "' NAME '", "' PATH '", "' GUID '"'
    ///             projectSection* "EndProject"
    fn parse_project(&mut self) -> Result<ProjectReference, SlnError> {
        let line = self.next_line("Project")?;
        let [type_guid, name, path, guid] = match lexer::project_line_values(line.text) {
            Some(values) => values,
            None => {
                return self.err_malformed(
                    line,
                    "a Project line with four quoted values: type GUID, name, path, GUID",
                )
            }
        };
        let project_type_guid = self.parse_guid(line, type_guid, "a project type GUID")?;
        let project_guid = self.parse_guid(line, guid, "a project GUID")?;
        trace!("project `{name}` ({path})");

        let mut project = ProjectReference::new(project_type_guid, name, path, project_guid);

        while self.check(LineKind::ProjectSection) {
            project.sections.push(self.parse_project_section()?);
        }

        match self.current_line() {
            Some(end) if lexer::classify(end.text) == LineKind::EndProject => {
                self.advance();
                Ok(project)
            }
            Some(found) => Err(ParserError::UnterminatedProject {
                src: self.source.clone(),
                span: span_of(found),
                found: found.text.to_string(),
            }
            .into()),
            None => Err(ParserError::UnterminatedProject {
                src: self.source.clone(),
                span: self.eof_span(),
                found: "end of file".to_string(),
            }
            .into()),
        }
    }

    /// projectSection ::= 'ProjectSection(' NAME ') = ' SCOPE rawLine* "EndProjectSection"
    fn parse_project_section(&mut self) -> Result<ProjectSection, SlnError> {
        let line = self.next_line("ProjectSection")?;
        let expected = "`ProjectSection(Name) = preProject|postProject`";
        let (name, scope) = match lexer::project_section_values(line.text) {
            Some(values) => values,
            None => return self.err_malformed(line, expected),
        };
        let pre_or_post_project = match scope.parse::<PreOrPostProject>() {
            Ok(scope) => scope,
            Err(_) => return self.err_malformed(line, expected),
        };

        let lines = self.collect_raw_lines(LineKind::EndProjectSection)?;
        Ok(ProjectSection {
            name: name.to_string(),
            pre_or_post_project,
            lines,
        })
    }

    /// "Global" section* "EndGlobal"
    fn parse_global(&mut self) -> Result<Vec<GlobalSection>, SlnError> {
        match self.current_line() {
            Some(line) if lexer::classify(line.text) == LineKind::Global => self.advance(),
            Some(found) => {
                return Err(ParserError::MissingGlobalBlock {
                    src: self.source.clone(),
                    span: span_of(found),
                    found: found.text.to_string(),
                }
                .into())
            }
            None => return self.err_eof("Global"),
        }

        let mut sections = Vec::new();
        loop {
            let line = match self.current_line() {
                Some(line) => line,
                None => return self.err_eof("EndGlobal"),
            };
            match lexer::classify(line.text) {
                LineKind::EndGlobal => {
                    self.advance();
                    return Ok(sections);
                }
                LineKind::GlobalSection => sections.push(self.parse_global_section()?),
                _ => return self.err_malformed(line, "GlobalSection or EndGlobal"),
            }
        }
    }

    /// section ::= 'GlobalSection(' NAME ') = ' SCOPE contentLine* "EndGlobalSection"
    fn parse_global_section(&mut self) -> Result<GlobalSection, SlnError> {
        let line = self.next_line("GlobalSection")?;
        let expected = "`GlobalSection(Name) = preSolution|postSolution`";
        let (name, scope) = match lexer::global_section_values(line.text) {
            Some(values) => values,
            None => return self.err_malformed(line, expected),
        };
        let pre_or_post_solution = match scope.parse::<PreOrPostSolution>() {
            Ok(scope) => scope,
            Err(_) => return self.err_malformed(line, expected),
        };
        trace!("entering global section `{name}` ({scope})");

        // Only the exact spelling selects the nested-projects reading.
        let content = if name == NESTED_PROJECTS_SECTION_NAME {
            SectionContent::NestedProjects(self.parse_nested_projects()?)
        } else {
            SectionContent::General(self.collect_raw_lines(LineKind::EndGlobalSection)?)
        };

        Ok(GlobalSection {
            name: name.to_string(),
            pre_or_post_solution,
            content,
        })
    }

    /// nestingLine ::= '{' GUID '} = {' GUID '}'
    fn parse_nested_projects(&mut self) -> Result<Vec<ProjectNesting>, SlnError> {
        let mut nestings = Vec::new();
        loop {
            let line = match self.current_line() {
                Some(line) => line,
                None => return self.err_eof("EndGlobalSection"),
            };
            if lexer::classify(line.text) == LineKind::EndGlobalSection {
                self.advance();
                return Ok(nestings);
            }

            let nesting = lexer::nesting_values(line.text.trim()).and_then(|(child, parent)| {
                Some(ProjectNesting::new(
                    Uuid::parse_str(child).ok()?,
                    Uuid::parse_str(parent).ok()?,
                ))
            });
            match nesting {
                Some(nesting) => nestings.push(nesting),
                None => {
                    return Err(ParserError::MalformedNestingLine {
                        src: self.source.clone(),
                        span: span_of(line),
                        found: line.text.trim().to_string(),
                    }
                    .into())
                }
            }
            self.advance();
        }
    }

    /// Stores every line up to `end` trimmed but otherwise verbatim, then consumes `end`.
    fn collect_raw_lines(&mut self, end: LineKind) -> Result<Vec<String>, SlnError> {
        let mut lines = Vec::new();
        loop {
            let line = match self.current_line() {
                Some(line) => line,
                None => return self.err_eof(end.marker()),
            };
            self.advance();
            if lexer::classify(line.text) == end {
                return Ok(lines);
            }
            lines.push(line.text.trim().to_string());
        }
    }

    /// "" EOF. A single blank line may follow `EndGlobal`; nothing else may.
    fn parse_trailer(&mut self) -> Result<(), SlnError> {
        if self.check(LineKind::Blank) {
            self.advance();
        }
        let remaining = &self.lines[self.position.min(self.lines.len())..];
        if let Some(found) = remaining.iter().find(|l| !l.text.trim().is_empty()) {
            return Err(ParserError::TrailingContent {
                src: self.source.clone(),
                span: span_of(*found),
                found: found.text.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // === Line Helper Methods ===

    fn current_line(&self) -> Option<SourceLine<'a>> {
        self.lines.get(self.position).copied()
    }

    fn next_line(&mut self, expected: &str) -> Result<SourceLine<'a>, SlnError> {
        match self.current_line() {
            Some(line) => {
                self.advance();
                Ok(line)
            }
            None => self.err_eof(expected),
        }
    }

    fn advance(&mut self) {
        if let Some(line) = self.current_line() {
            trace!("consumed line {}: {:?}", self.position + 1, line.text);
            self.position += 1;
        }
    }

    fn check(&self, kind: LineKind) -> bool {
        self.current_line()
            .is_some_and(|line| lexer::classify(line.text) == kind)
    }

    fn parse_guid(
        &self,
        line: SourceLine<'a>,
        text: &str,
        expected: &str,
    ) -> Result<Uuid, SlnError> {
        Uuid::parse_str(text).or_else(|_| self.err_malformed(line, expected))
    }

    fn eof_span(&self) -> SourceSpan {
        (self.source_text.len(), 0).into()
    }

    // === Error Helper Methods ===

    #[track_caller]
    fn err_header<T>(&self, line: SourceLine<'a>, expected: &str) -> Result<T, SlnError> {
        trace!("header error raised at {}", Location::caller());
        Err(ParserError::MalformedHeader {
            src: self.source.clone(),
            span: span_of(line),
            expected: expected.to_string(),
            found: line.text.to_string(),
        }
        .into())
    }

    #[track_caller]
    fn err_malformed<T>(&self, line: SourceLine<'a>, expected: &str) -> Result<T, SlnError> {
        trace!("malformed line error raised at {}", Location::caller());
        Err(ParserError::MalformedLine {
            src: self.source.clone(),
            span: span_of(line),
            expected: expected.to_string(),
            found: line.text.trim().to_string(),
        }
        .into())
    }

    #[track_caller]
    fn err_eof<T>(&self, expected: &str) -> Result<T, SlnError> {
        trace!("end of file error raised at {}", Location::caller());
        Err(ParserError::UnexpectedEof {
            src: self.source.clone(),
            span: self.eof_span(),
            expected: expected.to_string(),
        }
        .into())
    }
}

fn span_of(line: SourceLine<'_>) -> SourceSpan {
    (line.offset, line.text.len()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    const HEADER: &str = "\nMicrosoft Visual Studio Solution File, Format Version 12.00\n# Visual Studio 15\nVisualStudioVersion = 15.0.26124.0\nMinimumVisualStudioVersion = 15.0.26124.0\n";

    fn parse_ok(source: &str) -> SolutionFile {
        let mut parser = Parser::new_with_name(source, "test.sln".to_string());
        match parser.parse_document() {
            Ok(doc) => doc,
            Err(err) => {
                let report = Report::from(err);
                panic!("{:?}", report);
            }
        }
    }

    fn parse_err(source: &str) -> ParserError {
        match Parser::new(source).parse_document() {
            Ok(doc) => panic!("expected a parse error, got {doc:#?}"),
            Err(SlnError::Parser(err)) => err,
            Err(other) => panic!("expected a parser error, got {other:?}"),
        }
    }

    fn with_header(body: &str) -> String {
        format!("{HEADER}{body}")
    }

    #[test]
    fn test_minimal_document() {
        let doc = parse_ok(&with_header("Global\nEndGlobal\n"));
        assert_eq!(doc.format_version, Version::new(12, 0));
        assert_eq!(doc.visual_studio_moniker, "# Visual Studio 15");
        assert_eq!(
            doc.visual_studio_version,
            Version::with_components(15, 0, 26124, 0)
        );
        assert!(doc.project_references.is_empty());
        assert!(doc.global_sections.is_empty());
    }

    #[test]
    fn test_crlf_and_bom_are_accepted() {
        let source = format!("\u{feff}{}", with_header("Global\nEndGlobal\n")).replace('\n', "\r\n");
        let doc = parse_ok(&source);
        assert_eq!(doc.visual_studio_moniker, "# Visual Studio 15");
    }

    #[test]
    fn test_project_with_sections() {
        let doc = parse_ok(&with_header(
            "Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Items\", \"Items\", \"{22222222-2222-2222-2222-222222222222}\"\n\
             \tProjectSection(SolutionItems) = preProject\n\
             \t\treadme.md = readme.md\n\
             \tEndProjectSection\n\
             EndProject\n\
             Global\n\
             EndGlobal\n",
        ));
        let project = &doc.project_references[0];
        assert_eq!(project.project_name, "Items");
        assert_eq!(project.sections.len(), 1);
        assert_eq!(project.sections[0].name, "SolutionItems");
        assert_eq!(
            project.sections[0].pre_or_post_project,
            PreOrPostProject::PreProject
        );
        assert_eq!(project.sections[0].lines, vec!["readme.md = readme.md"]);
    }

    #[test]
    fn test_general_section_keeps_internal_whitespace() {
        let doc = parse_ok(&with_header(
            "Global\n\tGlobalSection(nestedprojects) = postSolution\n\t\tA  =   B\n\tEndGlobalSection\nEndGlobal\n",
        ));
        let section = &doc.global_sections[0];
        assert_eq!(section.pre_or_post_solution, PreOrPostSolution::PostSolution);
        assert_eq!(
            section.content,
            SectionContent::General(vec!["A  =   B".to_string()])
        );
    }

    #[test]
    fn test_missing_end_project() {
        let err = parse_err(&with_header(
            "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"App\", \"App.csproj\", \"{9DAD5F24-3C22-47C9-8D69-3C7D72C62DAD}\"\nGlobal\nEndGlobal\n",
        ));
        assert!(matches!(err, ParserError::UnterminatedProject { ref found, .. } if found == "Global"));
    }

    #[test]
    fn test_bad_guid_in_project_line() {
        let err = parse_err(&with_header(
            "Project(\"{NOT-A-GUID}\") = \"App\", \"App.csproj\", \"{9DAD5F24-3C22-47C9-8D69-3C7D72C62DAD}\"\nEndProject\nGlobal\nEndGlobal\n",
        ));
        assert!(matches!(err, ParserError::MalformedLine { ref expected, .. } if expected == "a project type GUID"));
    }

    #[test]
    fn test_missing_global() {
        let err = parse_err(&with_header("Something\n"));
        assert!(matches!(err, ParserError::MissingGlobalBlock { ref found, .. } if found == "Something"));
    }

    #[test]
    fn test_bad_scope() {
        let err = parse_err(&with_header(
            "Global\n\tGlobalSection(X) = sometime\n\tEndGlobalSection\nEndGlobal\n",
        ));
        assert!(matches!(err, ParserError::MalformedLine { .. }));
    }

    #[test]
    fn test_unclosed_section_is_eof() {
        let err = parse_err(&with_header("Global\n\tGlobalSection(X) = preSolution\n\t\ta = b\n"));
        assert!(matches!(err, ParserError::UnexpectedEof { ref expected, .. } if expected == "EndGlobalSection"));
    }

    #[test]
    fn test_malformed_nesting_line() {
        let err = parse_err(&with_header(
            "Global\n\tGlobalSection(NestedProjects) = preSolution\n\t\t{9DAD5F24-3C22-47C9-8D69-3C7D72C62DAD}\n\tEndGlobalSection\nEndGlobal\n",
        ));
        assert!(matches!(err, ParserError::MalformedNestingLine { .. }));
    }

    #[test]
    fn test_trailing_content() {
        let err = parse_err(&with_header("Global\nEndGlobal\n\nextra\n"));
        assert!(matches!(err, ParserError::TrailingContent { ref found, .. } if found == "extra"));
    }

    #[test]
    fn test_header_errors() {
        let err = parse_err("Microsoft Visual Studio Solution File, Format Version 12.00\n");
        assert!(matches!(err, ParserError::MalformedHeader { .. }));

        let err = parse_err("\nMicrosoft Visual Studio Solution File, Format Version twelve\n");
        assert!(matches!(err, ParserError::MalformedHeader { .. }));

        let err = parse_err("\nMicrosoft Visual Studio Solution File, Format Version 12.00\n# Visual Studio 15\nVisualStudioVersion = 15.0.26124.0");
        assert!(matches!(err, ParserError::UnexpectedEof { .. }));

        let err = parse_err(&HEADER.replace("MinimumVisualStudioVersion", "MaximumVisualStudioVersion"));
        assert!(matches!(err, ParserError::MalformedHeader { .. }));
    }

    #[test]
    fn test_format_version_must_have_two_components() {
        let source = with_header("Global\nEndGlobal\n").replace("Format Version 12.00", "Format Version 12.00.1");
        let err = parse_err(&source);
        assert!(matches!(
            err,
            ParserError::MalformedHeader { ref found, .. } if found.ends_with("Format Version 12.00.1")
        ));

        let source = with_header("Global\nEndGlobal\n").replace("Format Version 12.00", "Format Version 12.00.1.2");
        assert!(matches!(parse_err(&source), ParserError::MalformedHeader { .. }));
    }

    #[test]
    fn test_moniker_requires_hash() {
        let source = with_header("Global\nEndGlobal\n").replace("# Visual Studio 15", "Visual Studio 15");
        let err = parse_err(&source);
        assert!(matches!(
            err,
            ParserError::MalformedHeader { ref found, .. } if found == "Visual Studio 15"
        ));
    }

    #[test]
    fn test_trailer_is_lenient_about_blank_lines() {
        let expected = parse_ok(&with_header("Global\nEndGlobal\n"));
        assert_eq!(parse_ok(&with_header("Global\nEndGlobal")), expected);
        assert_eq!(parse_ok(&with_header("Global\nEndGlobal\n\n\n \n\t\n")), expected);
        assert_eq!(
            parse_ok(&with_header("Global\nEndGlobal\n\n\n").replace('\n', "\r\n")),
            expected
        );
    }

    #[test]
    fn test_section_name_may_contain_equals() {
        let doc = parse_ok(&with_header(
            "Global\n\tGlobalSection(A=B) = preSolution\n\t\tx = y\n\tEndGlobalSection\nEndGlobal\n",
        ));
        assert_eq!(doc.global_sections[0].name, "A=B");
        assert_eq!(
            doc.global_sections[0].pre_or_post_solution,
            PreOrPostSolution::PreSolution
        );
        assert_eq!(
            crate::writer::to_sln_string(&doc).unwrap(),
            with_header("Global\n\tGlobalSection(A=B) = preSolution\n\t\tx = y\n\tEndGlobalSection\nEndGlobal\n")
        );
    }

    #[test]
    fn test_error_span_points_at_line() {
        let source = with_header("Oops\n");
        let err = parse_err(&source);
        match err {
            ParserError::MissingGlobalBlock { span, .. } => {
                assert_eq!(span.offset(), source.find("Oops").unwrap());
                assert_eq!(span.len(), 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
