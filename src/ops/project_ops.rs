use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::{business_repo, project_repo, user_repo};
use crate::error::{CrmError, CrmResult, FieldErrors};
use crate::model::{Business, Id, Project, ProjectKind, ProjectStatus, User};
use crate::ops::SaveOutcome;
use crate::validation::{self, trim_optional};

#[derive(Debug, Clone)]
pub struct ProjectFields {
    pub name: String,
    pub kind: ProjectKind,
    pub status: ProjectStatus,
    pub description: Option<String>,
    pub point_person_id: Id<User>,
    pub tracking_ref: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectSaveRequest {
    pub project_id: Option<Id<Project>>,
    pub business_id: Id<Business>,
    pub fields: ProjectFields,
}

/// Insert or update a project under a fixed business.
pub fn save_project(
    conn: &mut Connection,
    ctx: &RequestContext,
    request: ProjectSaveRequest,
) -> CrmResult<SaveOutcome<Project>> {
    ctx.require(Permission::ChangeProject)?;

    let tx = conn.transaction()?;

    business_repo::find_by_id(&tx, request.business_id)?.ok_or_else(|| CrmError::NotFound {
        entity_type: "Business".into(),
        id: request.business_id.to_string(),
    })?;
    user_repo::find_by_id(&tx, request.fields.point_person_id)?.ok_or_else(|| {
        CrmError::NotFound {
            entity_type: "User".into(),
            id: request.fields.point_person_id.to_string(),
        }
    })?;

    let existing = match request.project_id {
        Some(project_id) => Some(
            project_repo::find_by_id(&tx, project_id)?.ok_or_else(|| CrmError::NotFound {
                entity_type: "Project".into(),
                id: project_id.to_string(),
            })?,
        ),
        None => None,
    };

    let mut errors = FieldErrors::new();
    let name = errors.check("name", validation::non_blank(&request.fields.name));

    if !errors.is_empty() {
        return Ok(SaveOutcome::Invalid(errors));
    }
    let Some(name) = name else {
        return Ok(SaveOutcome::Invalid(errors));
    };

    let created = existing.is_none();
    let mut project = existing.unwrap_or_else(|| {
        Project::create(
            request.business_id,
            name.clone(),
            request.fields.kind,
            request.fields.status,
            request.fields.point_person_id,
        )
    });

    project.name = name;
    project.kind = request.fields.kind;
    project.status = request.fields.status;
    project.description = trim_optional(request.fields.description.as_deref());
    project.point_person_id = request.fields.point_person_id;
    project.tracking_ref = trim_optional(request.fields.tracking_ref.as_deref());

    if created {
        project_repo::insert(&tx, &project)?;
    } else {
        project_repo::update(&tx, &project)?;
    }

    tx.commit()?;

    if created {
        tracing::info!(project_id = %project.id, "project created");
    }

    Ok(SaveOutcome::Saved(project))
}
