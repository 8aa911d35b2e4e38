use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned project identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        ProjectId(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    // Anything the server sends that is not "active" reads as inactive.
    #[serde(other)]
    Inactive,
}

impl ProjectStatus {
    /// Binary flip used by the status badge.
    pub fn toggled(self) -> Self {
        match self {
            ProjectStatus::Active => ProjectStatus::Inactive,
            ProjectStatus::Inactive => ProjectStatus::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProject")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

/// Fields of the project form, also the body of a create call.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
}

// The API is inconsistent about `id` versus `_id`; accept either.
#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    id: Option<ProjectId>,
    #[serde(rename = "_id", default)]
    mongo_id: Option<ProjectId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: ProjectStatus,
}

impl TryFrom<RawProject> for Project {
    type Error = String;

    fn try_from(raw: RawProject) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.mongo_id)
            .ok_or_else(|| format!("project '{}' has no id", raw.title))?;

        Ok(Project {
            id,
            title: raw.title,
            description: raw.description,
            status: raw.status,
        })
    }
}
