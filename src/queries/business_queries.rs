use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::{business_repo, project_repo};
use crate::error::{CrmError, CrmResult};
use crate::ledger::{Exchange, LedgerProvider};
use crate::model::{Address, Business, Id, Project, User};
use crate::queries::ListOutcome;

/// The businesses list. Queries match name or notes; exactly one match
/// redirects.
pub fn list_businesses(
    conn: &Connection,
    ctx: &RequestContext,
    query: Option<&str>,
) -> CrmResult<ListOutcome<Business>> {
    ctx.require(Permission::ViewBusiness)?;

    let query = query.map(str::trim).filter(|q| !q.is_empty());
    let businesses = match query {
        Some(q) => business_repo::search(conn, q)?,
        None => business_repo::find_all(conn)?,
    };

    Ok(ListOutcome::from_rows(query.is_some(), businesses))
}

#[derive(Debug, Clone)]
pub struct BusinessOverview {
    pub business: Business,
    pub address: Option<Address>,
    pub projects: Vec<Project>,
    pub contacts: Vec<User>,
    pub exchanges: Vec<Exchange>,
    pub show_delivered_column: bool,
}

/// Everything the business detail view renders. Exchange data comes from
/// the ledger capability and is simply empty when none is installed.
pub fn business_overview(
    conn: &Connection,
    ctx: &RequestContext,
    ledger: &dyn LedgerProvider,
    business_id: Id<Business>,
) -> CrmResult<BusinessOverview> {
    ctx.require(Permission::ViewBusiness)?;

    let business =
        business_repo::find_by_id(conn, business_id)?.ok_or_else(|| CrmError::NotFound {
            entity_type: "Business".into(),
            id: business_id.to_string(),
        })?;

    let address = business_repo::find_address(conn, business_id)?;
    let projects = project_repo::find_by_business(conn, business_id)?;
    let contacts = business_repo::find_contacts(conn, business_id)?;
    let exchanges = ledger.business_exchanges(business_id);
    let show_delivered_column = exchanges.iter().any(|e| e.deliverable);

    Ok(BusinessOverview {
        business,
        address,
        projects,
        contacts,
        exchanges,
        show_delivered_column,
    })
}
