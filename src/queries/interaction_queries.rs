use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::interaction_repo;
use crate::error::CrmResult;
use crate::model::Interaction;

/// The interactions list. With a query, searches kind, project name,
/// contact names, and memo across all interactions; without one, the
/// acting user's own interactions.
pub fn list_interactions(
    conn: &Connection,
    ctx: &RequestContext,
    query: Option<&str>,
) -> CrmResult<Vec<Interaction>> {
    ctx.require(Permission::ViewInteraction)?;

    let query = query.map(str::trim).filter(|q| !q.is_empty());
    match query {
        Some(q) => interaction_repo::search(conn, q),
        None => interaction_repo::find_for_contact(conn, ctx.actor()),
    }
}
