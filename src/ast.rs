use crate::serialization::{serialize_guid, serialize_version};
use serde::Serialize;
use std::fmt::{self, Display};
use std::str::FromStr;
use uuid::Uuid;

/// The reserved section name that selects the nested-projects representation.
pub const NESTED_PROJECTS_SECTION_NAME: &str = "NestedProjects";

/// A parsed `.sln` document.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SolutionFile {
    /// The `12.00` in `Microsoft Visual Studio Solution File, Format Version 12.00`.
    #[serde(serialize_with = "serialize_version")]
    pub format_version: Version,
    /// The banner line stored verbatim, e.g. `# Visual Studio 15`.
    pub visual_studio_moniker: String,
    #[serde(serialize_with = "serialize_version")]
    pub visual_studio_version: Version,
    #[serde(serialize_with = "serialize_version")]
    pub minimum_visual_studio_version: Version,
    pub project_references: Vec<ProjectReference>,
    pub global_sections: Vec<GlobalSection>,
}

impl SolutionFile {
    /// An empty solution in the shape Visual Studio 2017 creates.
    pub fn new() -> Self {
        Self {
            format_version: Version::new(12, 0),
            visual_studio_moniker: "# Visual Studio 15".to_string(),
            visual_studio_version: Version::with_components(15, 0, 26124, 0),
            minimum_visual_studio_version: Version::with_components(15, 0, 26124, 0),
            project_references: Vec::new(),
            global_sections: Vec::new(),
        }
    }
}

impl Default for SolutionFile {
    fn default() -> Self {
        Self::new()
    }
}

/// One `Project(...)` ... `EndProject` block.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ProjectReference {
    #[serde(serialize_with = "serialize_guid")]
    pub project_type_guid: Uuid,
    pub project_name: String,
    pub project_file_relative_path: String,
    #[serde(serialize_with = "serialize_guid")]
    pub project_guid: Uuid,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<ProjectSection>,
}

impl ProjectReference {
    pub fn new(
        project_type_guid: Uuid,
        project_name: impl Into<String>,
        project_file_relative_path: impl Into<String>,
        project_guid: Uuid,
    ) -> Self {
        Self {
            project_type_guid,
            project_name: project_name.into(),
            project_file_relative_path: project_file_relative_path.into(),
            project_guid,
            sections: Vec::new(),
        }
    }
}

/// A `ProjectSection(Name) = preProject` block inside a project entry.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ProjectSection {
    pub name: String,
    pub pre_or_post_project: PreOrPostProject,
    pub lines: Vec<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum PreOrPostProject {
    #[serde(rename = "preProject")]
    PreProject,
    #[serde(rename = "postProject")]
    PostProject,
}

impl PreOrPostProject {
    pub fn as_str(self) -> &'static str {
        match self {
            PreOrPostProject::PreProject => "preProject",
            PreOrPostProject::PostProject => "postProject",
        }
    }
}

impl FromStr for PreOrPostProject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preProject" => Ok(PreOrPostProject::PreProject),
            "postProject" => Ok(PreOrPostProject::PostProject),
            other => Err(format!("unrecognized project section scope `{other}`")),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum PreOrPostSolution {
    #[serde(rename = "preSolution")]
    PreSolution,
    #[serde(rename = "postSolution")]
    PostSolution,
}

impl PreOrPostSolution {
    pub fn as_str(self) -> &'static str {
        match self {
            PreOrPostSolution::PreSolution => "preSolution",
            PreOrPostSolution::PostSolution => "postSolution",
        }
    }
}

impl FromStr for PreOrPostSolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preSolution" => Ok(PreOrPostSolution::PreSolution),
            "postSolution" => Ok(PreOrPostSolution::PostSolution),
            other => Err(format!("unrecognized global section scope `{other}`")),
        }
    }
}

impl Display for PreOrPostSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for PreOrPostProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named block inside `Global` ... `EndGlobal`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct GlobalSection {
    pub name: String,
    pub pre_or_post_solution: PreOrPostSolution,
    pub content: SectionContent,
}

impl GlobalSection {
    pub fn general(
        name: impl Into<String>,
        pre_or_post_solution: PreOrPostSolution,
        lines: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pre_or_post_solution,
            content: SectionContent::General(lines),
        }
    }

    pub fn nested_projects(
        pre_or_post_solution: PreOrPostSolution,
        nestings: Vec<ProjectNesting>,
    ) -> Self {
        Self {
            name: NESTED_PROJECTS_SECTION_NAME.to_string(),
            pre_or_post_solution,
            content: SectionContent::NestedProjects(nestings),
        }
    }
}

/// Section content, tagged by how the parser interpreted the section body.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "kind", content = "entries")]
pub enum SectionContent {
    /// Raw trimmed lines, kept in order.
    General(Vec<String>),
    NestedProjects(Vec<ProjectNesting>),
}

/// `{child} = {parent}`: the child project or folder sits under the parent folder.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct ProjectNesting {
    #[serde(serialize_with = "serialize_guid")]
    pub child_project_guid: Uuid,
    #[serde(serialize_with = "serialize_guid")]
    pub parent_project_guid: Uuid,
}

impl ProjectNesting {
    pub fn new(child_project_guid: Uuid, parent_project_guid: Uuid) -> Self {
        Self {
            child_project_guid,
            parent_project_guid,
        }
    }
}

impl Display for ProjectNesting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {}",
            fmt_guid(&self.child_project_guid),
            fmt_guid(&self.parent_project_guid)
        )
    }
}

/// Renders a GUID the way solution files spell them: `{9DAD5F24-3C22-47C9-8D69-3C7D72C62DAD}`.
pub fn fmt_guid(guid: &Uuid) -> String {
    guid.braced().to_string().to_uppercase()
}

/// A dotted version with two to four numeric components.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    pub fn with_components(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: Some(revision),
        }
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| format!("`{part}` is not a version component in `{s}`"))
            })
            .collect::<Result<Vec<u32>, String>>()?;

        match components.as_slice() {
            [major, minor] => Ok(Version::new(*major, *minor)),
            [major, minor, build] => Ok(Version {
                major: *major,
                minor: *minor,
                build: Some(*build),
                revision: None,
            }),
            [major, minor, build, revision] => {
                Ok(Version::with_components(*major, *minor, *build, *revision))
            }
            _ => Err(format!("`{s}` must have between two and four components")),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
            if let Some(revision) = self.revision {
                write!(f, ".{revision}")?;
            }
        }
        Ok(())
    }
}
