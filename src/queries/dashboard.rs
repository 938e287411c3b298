use rusqlite::Connection;

use crate::access::RequestContext;
use crate::db::{interaction_repo, project_repo};
use crate::error::CrmResult;
use crate::ledger::{Exchange, LedgerProvider};
use crate::model::{Interaction, Project};

const RECENT_INTERACTIONS: i64 = 6;
const RECENT_EXCHANGES: usize = 10;

#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Incomplete interactions, soonest first.
    pub upcoming_interactions: Vec<Interaction>,
    /// Completed interactions, most recent first.
    pub recent_interactions: Vec<Interaction>,
    pub projects: Vec<Project>,
    pub recent_exchanges: Vec<Exchange>,
}

/// The landing page for the acting user. Everything here is scoped to them,
/// so no extra permission applies.
pub fn dashboard(
    conn: &Connection,
    ctx: &RequestContext,
    ledger: &dyn LedgerProvider,
) -> CrmResult<Dashboard> {
    let actor = ctx.actor();

    let upcoming_interactions = interaction_repo::find_upcoming_for_contact(conn, actor)?;
    let recent_interactions =
        interaction_repo::find_completed_recent(conn, actor, RECENT_INTERACTIONS)?;
    let projects = project_repo::find_by_contact(conn, actor)?;

    let mut recent_exchanges = ledger.user_exchanges(actor);
    recent_exchanges.truncate(RECENT_EXCHANGES);

    Ok(Dashboard {
        upcoming_interactions,
        recent_interactions,
        projects,
        recent_exchanges,
    })
}
