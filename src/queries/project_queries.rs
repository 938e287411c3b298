use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::{business_repo, project_repo};
use crate::error::{CrmError, CrmResult};
use crate::ledger::{Exchange, LedgerProvider};
use crate::model::{Business, Id, Project, User};
use crate::queries::ListOutcome;

/// The projects list. Queries match name or description; exactly one match
/// redirects.
pub fn list_projects(
    conn: &Connection,
    ctx: &RequestContext,
    query: Option<&str>,
) -> CrmResult<ListOutcome<Project>> {
    ctx.require(Permission::ViewProject)?;

    let query = query.map(str::trim).filter(|q| !q.is_empty());
    let projects = match query {
        Some(q) => project_repo::search(conn, q)?,
        None => project_repo::find_all(conn)?,
    };

    Ok(ListOutcome::from_rows(query.is_some(), projects))
}

#[derive(Debug, Clone)]
pub struct ProjectContact {
    pub user: User,
    pub relationship_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectOverview {
    pub project: Project,
    pub business: Business,
    pub contacts: Vec<ProjectContact>,
    pub exchanges: Vec<Exchange>,
    pub show_delivered_column: bool,
}

/// Everything the project detail view renders, exchanges scoped to the
/// project.
pub fn project_overview(
    conn: &Connection,
    ctx: &RequestContext,
    ledger: &dyn LedgerProvider,
    project_id: Id<Project>,
) -> CrmResult<ProjectOverview> {
    ctx.require(Permission::ViewProject)?;

    let project =
        project_repo::find_by_id(conn, project_id)?.ok_or_else(|| CrmError::NotFound {
            entity_type: "Project".into(),
            id: project_id.to_string(),
        })?;

    let business = business_repo::find_by_id(conn, project.business_id)?.ok_or_else(|| {
        CrmError::NotFound {
            entity_type: "Business".into(),
            id: project.business_id.to_string(),
        }
    })?;

    let contacts = project_repo::find_relationships(conn, project_id)?
        .into_iter()
        .map(|(relationship, user)| ProjectContact {
            user,
            relationship_types: relationship.types,
        })
        .collect();

    let exchanges = ledger.project_exchanges(project_id);
    let show_delivered_column = exchanges.iter().any(|e| e.deliverable);

    Ok(ProjectOverview {
        project,
        business,
        contacts,
        exchanges,
        show_delivered_column,
    })
}
