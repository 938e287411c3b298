//! Quick search: the JSON autocomplete endpoints. Results are gathered per
//! entity kind in a fixed priority order, each kind gated by its view
//! permission, then merged, sorted by label, and capped.

use rusqlite::Connection;
use serde::Serialize;

use crate::access::{Permission, RequestContext};
use crate::db::{business_repo, profile_repo, project_repo, user_repo};
use crate::error::CrmResult;
use crate::model::{Business, Id, Profile, Project, User};

pub const QUICK_SEARCH_LIMIT: usize = 10;

/// One autocomplete entry. Serializes to
/// `{label, href|element_id, element_class}`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    pub element_class: &'static str,
}

/// Substring search across businesses, projects, and contacts, in that
/// priority order, each kind only when the caller may view it. The merged
/// list is sorted by label and truncated to [`QUICK_SEARCH_LIMIT`].
pub fn quick_search(
    conn: &Connection,
    ctx: &RequestContext,
    query: &str,
) -> CrmResult<Vec<SearchHit>> {
    let mut hits = Vec::new();

    if ctx.can(Permission::ViewBusiness) {
        for business in business_repo::search_by_name(conn, query)? {
            hits.push(SearchHit {
                label: business.name.clone(),
                href: Some(business_href(business.id)),
                element_id: None,
                element_class: "business",
            });
        }
    }

    if ctx.can(Permission::ViewProject) {
        for project in project_repo::search_by_name(conn, query)? {
            hits.push(SearchHit {
                label: project.name.clone(),
                href: Some(project_href(project.business_id, project.id)),
                element_id: None,
                element_class: "project",
            });
        }
    }

    if ctx.can(Permission::ViewProfile) {
        for (profile, user) in profile_repo::search_any(conn, query)? {
            hits.push(SearchHit {
                label: user.full_name(),
                href: Some(person_href(profile.id)),
                element_id: None,
                element_class: "contact",
            });
        }
    }

    hits.sort_by(|a, b| a.label.cmp(&b.label));
    hits.truncate(QUICK_SEARCH_LIMIT);
    Ok(hits)
}

/// Contact-only search backing the associate-contact autocompleter. Hits
/// carry the user id as `element_id` instead of a link.
pub fn quick_add_person(
    conn: &Connection,
    ctx: &RequestContext,
    query: &str,
) -> CrmResult<Vec<SearchHit>> {
    ctx.require(Permission::ChangeBusiness)?;
    ctx.require(Permission::ChangeProject)?;

    let mut hits = Vec::new();
    for (_, user) in profile_repo::search_any(conn, query)? {
        hits.push(SearchHit {
            label: user.full_name(),
            href: None,
            element_id: Some(user.id.to_string()),
            element_class: "contact",
        });
    }

    hits.truncate(QUICK_SEARCH_LIMIT);
    Ok(hits)
}

/// Scope filter for contact pickers.
#[derive(Debug, Clone, Copy)]
pub enum ContactScope {
    Business(Id<Business>),
    Project(Id<Project>),
}

/// `(user id, "Full Name (email)")` choices for a contact picker,
/// optionally restricted to a business's or project's contacts.
pub fn contact_choices(
    conn: &Connection,
    scope: Option<ContactScope>,
) -> CrmResult<Vec<(Id<User>, String)>> {
    let users = match scope {
        Some(ContactScope::Project(project_id)) => project_repo::find_contacts(conn, project_id)?,
        Some(ContactScope::Business(business_id)) => {
            business_repo::find_contacts(conn, business_id)?
        }
        None => user_repo::find_all(conn)?,
    };

    Ok(users
        .into_iter()
        .map(|user| {
            let label = format!("{} ({})", user.full_name(), user.email);
            (user.id, label)
        })
        .collect())
}

/// Serialize hits for the `text/json` endpoints.
pub fn to_json(hits: &[SearchHit]) -> CrmResult<String> {
    Ok(serde_json::to_string(hits)?)
}

pub fn business_href(business_id: Id<Business>) -> String {
    format!("/businesses/{}", business_id)
}

pub fn project_href(business_id: Id<Business>, project_id: Id<Project>) -> String {
    format!("/businesses/{}/projects/{}", business_id, project_id)
}

pub fn person_href(profile_id: Id<Profile>) -> String {
    format!("/people/{}", profile_id)
}
