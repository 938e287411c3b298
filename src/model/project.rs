use serde::{Deserialize, Serialize};

use super::business::Business;
use super::ids::Id;
use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectKind {
    Consultation,
    Development,
    Maintenance,
    Internal,
}

impl ProjectKind {
    pub const ALL: &'static [ProjectKind] = &[
        ProjectKind::Consultation,
        ProjectKind::Development,
        ProjectKind::Maintenance,
        ProjectKind::Internal,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectKind::Consultation => "Consultation",
            ProjectKind::Development => "Development",
            ProjectKind::Maintenance => "Maintenance",
            ProjectKind::Internal => "Internal",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Consultation" => Some(ProjectKind::Consultation),
            "Development" => Some(ProjectKind::Development),
            "Maintenance" => Some(ProjectKind::Maintenance),
            "Internal" => Some(ProjectKind::Internal),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProjectKind::Consultation => "Consultation",
            ProjectKind::Development => "Development",
            ProjectKind::Maintenance => "Maintenance",
            ProjectKind::Internal => "Internal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: &'static [ProjectStatus] = &[
        ProjectStatus::Requested,
        ProjectStatus::Accepted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectStatus::Requested => "Requested",
            ProjectStatus::Accepted => "Accepted",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Requested" => Some(ProjectStatus::Requested),
            "Accepted" => Some(ProjectStatus::Accepted),
            "InProgress" => Some(ProjectStatus::InProgress),
            "Completed" => Some(ProjectStatus::Completed),
            "Cancelled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProjectStatus::Requested => "Requested",
            ProjectStatus::Accepted => "Accepted",
            ProjectStatus::InProgress => "InProgress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }
}

/// A unit of work for a business. The point person is the user responsible
/// for it; contacts are attached through [`ProjectRelationship`] rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Id<Project>,
    pub business_id: Id<Business>,
    pub name: String,
    pub kind: ProjectKind,
    pub status: ProjectStatus,
    pub description: Option<String>,
    pub point_person_id: Id<User>,
    pub tracking_ref: Option<String>,
}

impl Project {
    pub fn create(
        business_id: Id<Business>,
        name: String,
        kind: ProjectKind,
        status: ProjectStatus,
        point_person_id: Id<User>,
    ) -> Self {
        Self {
            id: Id::generate(),
            business_id,
            name,
            kind,
            status,
            description: None,
            point_person_id,
            tracking_ref: None,
        }
    }
}

/// Join entity recording a user's role on a project. Unique per
/// (project, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRelationship {
    pub project_id: Id<Project>,
    pub user_id: Id<User>,
    pub types: Vec<String>,
}

impl ProjectRelationship {
    pub fn create(project_id: Id<Project>, user_id: Id<User>) -> Self {
        Self {
            project_id,
            user_id,
            types: Vec::new(),
        }
    }
}
