//! Convenience operations over a parsed [`SolutionFile`].
//!
//! None of these touch the text grammar; they edit the model that the parser
//! produces and the writer consumes. Lookups cross-reference projects and
//! nesting entries by GUID value.

use crate::ast::*;
use log::debug;
use uuid::{uuid, Uuid};

/// Project type GUID Visual Studio uses for solution folders.
pub const SOLUTION_FOLDER_PROJECT_TYPE_GUID: Uuid = uuid!("2150E333-8FDC-42A3-9474-1A3956D46DE8");
/// Project type GUID of classic C# projects.
pub const CSHARP_PROJECT_TYPE_GUID: Uuid = uuid!("FAE04EC0-301F-11D3-BF4B-00C04F79EFBC");
/// Project type GUID of SDK-style .NET projects.
pub const NET_SDK_PROJECT_TYPE_GUID: Uuid = uuid!("9A19103F-16F7-4668-BE54-9A1E7A4F7556");

pub const DEPENDENCIES_SOLUTION_FOLDER_NAME: &str = "_Dependencies";
pub const SOLUTION_CONFIGURATION_PLATFORMS_SECTION_NAME: &str = "SolutionConfigurationPlatforms";
pub const PROJECT_CONFIGURATION_PLATFORMS_SECTION_NAME: &str = "ProjectConfigurationPlatforms";

impl SolutionFile {
    pub fn find_project(&self, project_guid: Uuid) -> Option<&ProjectReference> {
        self.project_references
            .iter()
            .find(|p| p.project_guid == project_guid)
    }

    pub fn find_project_mut(&mut self, project_guid: Uuid) -> Option<&mut ProjectReference> {
        self.project_references
            .iter_mut()
            .find(|p| p.project_guid == project_guid)
    }

    pub fn find_project_by_name(&self, project_name: &str) -> Option<&ProjectReference> {
        self.project_references
            .iter()
            .find(|p| p.project_name == project_name)
    }

    pub fn find_global_section(&self, name: &str) -> Option<&GlobalSection> {
        self.global_sections.iter().find(|s| s.name == name)
    }

    /// Appends a project reference with a fresh GUID and returns that GUID.
    pub fn add_project_reference(
        &mut self,
        project_type_guid: Uuid,
        project_name: impl Into<String>,
        project_file_relative_path: impl Into<String>,
    ) -> Uuid {
        let project_guid = Uuid::new_v4();
        let project = ProjectReference::new(
            project_type_guid,
            project_name,
            project_file_relative_path,
            project_guid,
        );
        debug!(
            "adding project `{}` as {}",
            project.project_name,
            fmt_guid(&project_guid)
        );
        self.project_references.push(project);
        project_guid
    }

    // --- Dependencies solution folder ---

    pub fn dependencies_solution_folder(&self) -> Option<&ProjectReference> {
        self.project_references.iter().find(|p| {
            p.project_type_guid == SOLUTION_FOLDER_PROJECT_TYPE_GUID
                && p.project_name == DEPENDENCIES_SOLUTION_FOLDER_NAME
        })
    }

    pub fn has_dependencies_solution_folder(&self) -> bool {
        self.dependencies_solution_folder().is_some()
    }

    /// Returns the GUID of the dependencies folder, creating the folder when missing.
    pub fn add_dependencies_solution_folder(&mut self) -> Uuid {
        match self.dependencies_solution_folder() {
            Some(folder) => folder.project_guid,
            None => self.add_project_reference(
                SOLUTION_FOLDER_PROJECT_TYPE_GUID,
                DEPENDENCIES_SOLUTION_FOLDER_NAME,
                DEPENDENCIES_SOLUTION_FOLDER_NAME,
            ),
        }
    }

    // --- Nesting ---

    /// Entries of the first `NestedProjects` section, or an empty slice.
    pub fn nested_projects(&self) -> &[ProjectNesting] {
        self.global_sections
            .iter()
            .find_map(|s| match &s.content {
                SectionContent::NestedProjects(nestings) => Some(nestings.as_slice()),
                SectionContent::General(_) => None,
            })
            .unwrap_or(&[])
    }

    /// Mutable entries of the first `NestedProjects` section, if there is one.
    pub fn nested_projects_mut(&mut self) -> Option<&mut Vec<ProjectNesting>> {
        self.global_sections
            .iter_mut()
            .find_map(|s| match &mut s.content {
                SectionContent::NestedProjects(nestings) => Some(nestings),
                SectionContent::General(_) => None,
            })
    }

    /// Places `child` under `parent`, replacing any previous parent of `child`.
    /// A `preSolution` `NestedProjects` section is created when missing.
    pub fn nest_project(&mut self, child_project_guid: Uuid, parent_project_guid: Uuid) {
        let nesting = ProjectNesting::new(child_project_guid, parent_project_guid);
        match self.nested_projects_mut() {
            Some(nestings) => {
                nestings.retain(|n| n.child_project_guid != child_project_guid);
                nestings.push(nesting);
            }
            None => {
                debug!("creating the {NESTED_PROJECTS_SECTION_NAME} section");
                self.global_sections.push(GlobalSection::nested_projects(
                    PreOrPostSolution::PreSolution,
                    vec![nesting],
                ));
            }
        }
    }

    pub fn parent_of(&self, child_project_guid: Uuid) -> Option<Uuid> {
        self.nested_projects()
            .iter()
            .find(|n| n.child_project_guid == child_project_guid)
            .map(|n| n.parent_project_guid)
    }

    pub fn children_of(&self, parent_project_guid: Uuid) -> Vec<Uuid> {
        self.nested_projects()
            .iter()
            .filter(|n| n.parent_project_guid == parent_project_guid)
            .map(|n| n.child_project_guid)
            .collect()
    }

    // --- Configuration platforms ---

    /// Solution configurations such as `Debug|Any CPU`, in file order.
    pub fn solution_configurations(&self) -> Vec<String> {
        match self
            .find_global_section(SOLUTION_CONFIGURATION_PLATFORMS_SECTION_NAME)
            .map(|s| &s.content)
        {
            Some(SectionContent::General(lines)) => lines
                .iter()
                .filter_map(|line| line.split_once('='))
                .map(|(configuration, _)| configuration.trim().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Maps every solution configuration onto `project_guid`, building it under the
    /// same configuration name. The `ProjectConfigurationPlatforms` section is created
    /// `postSolution` when missing.
    pub fn add_project_configurations(&mut self, project_guid: Uuid) {
        let configurations = self.solution_configurations();
        let guid = fmt_guid(&project_guid);
        let new_lines = configurations.iter().flat_map(|configuration| {
            [
                format!("{guid}.{configuration}.ActiveCfg = {configuration}"),
                format!("{guid}.{configuration}.Build.0 = {configuration}"),
            ]
        });

        let existing = self
            .global_sections
            .iter()
            .position(|s| s.name == PROJECT_CONFIGURATION_PLATFORMS_SECTION_NAME);
        match existing.map(|index| &mut self.global_sections[index].content) {
            Some(SectionContent::General(lines)) => lines.extend(new_lines),
            Some(SectionContent::NestedProjects(_)) => {
                debug!("{PROJECT_CONFIGURATION_PLATFORMS_SECTION_NAME} is not a general section; leaving it untouched")
            }
            None => self.global_sections.push(GlobalSection::general(
                PROJECT_CONFIGURATION_PLATFORMS_SECTION_NAME,
                PreOrPostSolution::PostSolution,
                new_lines.collect(),
            )),
        }
    }
}
