use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Lifecycle state of a project document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Backlog,
    Blocked,
    Archived,
    Abandoned,
    /// A status string this program does not recognise
    Other(String),
}

impl ProjectStatus {
    pub fn parse(s: &str) -> ProjectStatus {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => ProjectStatus::Active,
            "backlog" => ProjectStatus::Backlog,
            "blocked" => ProjectStatus::Blocked,
            "archived" => ProjectStatus::Archived,
            "abandoned" => ProjectStatus::Abandoned,
            _ => ProjectStatus::Other(s.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Backlog => "Backlog",
            ProjectStatus::Blocked => "Blocked",
            ProjectStatus::Archived => "Archived",
            ProjectStatus::Abandoned => "Abandoned",
            ProjectStatus::Other(s) => s,
        }
    }

    /// Archived and abandoned projects are closed
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Active | ProjectStatus::Backlog | ProjectStatus::Blocked
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A project is a markdown document marked `type = "project"` in its front matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Document path relative to the workspace root
    pub path: PathBuf,
    pub name: String,
    pub status: ProjectStatus,
}
