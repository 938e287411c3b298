use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::{business_repo, project_repo, user_repo};
use crate::error::{CrmError, CrmResult};
use crate::model::{Business, Id, Project, ProjectRelationship, User};
use crate::ops::business_ops::clean_tags;

/// What a user is being attached to or detached from.
#[derive(Debug, Clone, Copy)]
pub enum ContactTarget {
    Business(Id<Business>),
    Project(Id<Project>),
}

/// Removing a membership that doesn't exist is a reportable no-op, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    Removed,
    NotFound,
}

/// Attach a user to a business (direct many-to-many) or a project
/// (get-or-create of the join row). Idempotent: associating twice leaves
/// one membership.
pub fn associate(
    conn: &mut Connection,
    ctx: &RequestContext,
    user_id: Id<User>,
    target: ContactTarget,
) -> CrmResult<()> {
    ctx.require(Permission::ChangeBusiness)?;
    ctx.require(Permission::ChangeProject)?;

    let tx = conn.transaction()?;

    user_repo::find_by_id(&tx, user_id)?.ok_or_else(|| CrmError::NotFound {
        entity_type: "User".into(),
        id: user_id.to_string(),
    })?;

    match target {
        ContactTarget::Business(business_id) => {
            business_repo::find_by_id(&tx, business_id)?.ok_or_else(|| CrmError::NotFound {
                entity_type: "Business".into(),
                id: business_id.to_string(),
            })?;
            business_repo::add_contact(&tx, business_id, user_id)?;
        }
        ContactTarget::Project(project_id) => {
            project_repo::find_by_id(&tx, project_id)?.ok_or_else(|| CrmError::NotFound {
                entity_type: "Project".into(),
                id: project_id.to_string(),
            })?;
            project_repo::ensure_relationship(&tx, project_id, user_id)?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Detach a user from a business or project. A missing membership reports
/// `DetachOutcome::NotFound` and modifies nothing.
pub fn disassociate(
    conn: &mut Connection,
    ctx: &RequestContext,
    user_id: Id<User>,
    target: ContactTarget,
) -> CrmResult<DetachOutcome> {
    ctx.require(Permission::ChangeBusiness)?;
    ctx.require(Permission::ChangeProject)?;

    let tx = conn.transaction()?;

    let removed = match target {
        ContactTarget::Business(business_id) => {
            business_repo::remove_contact(&tx, business_id, user_id)?
        }
        ContactTarget::Project(project_id) => {
            project_repo::delete_relationship(&tx, project_id, user_id)?
        }
    };

    tx.commit()?;

    if removed == 0 {
        Ok(DetachOutcome::NotFound)
    } else {
        Ok(DetachOutcome::Removed)
    }
}

/// Replace the relationship-type tags on an existing (project, user) join
/// row.
pub fn set_relationship_types(
    conn: &mut Connection,
    ctx: &RequestContext,
    project_id: Id<Project>,
    user_id: Id<User>,
    types: Vec<String>,
) -> CrmResult<ProjectRelationship> {
    ctx.require(Permission::ChangeProject)?;

    let tx = conn.transaction()?;

    let mut relationship = project_repo::find_relationship(&tx, project_id, user_id)?
        .ok_or_else(|| CrmError::NotFound {
            entity_type: "ProjectRelationship".into(),
            id: format!("{}/{}", project_id, user_id),
        })?;

    relationship.types = clean_tags(types);
    project_repo::set_relationship_types(&tx, project_id, user_id, &relationship.types)?;

    tx.commit()?;
    Ok(relationship)
}
