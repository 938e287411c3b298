use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::{interaction_repo, profile_repo};
use crate::error::{CrmError, CrmResult};
use crate::model::{Id, Interaction, Phone, Profile, User};
use crate::queries::ListOutcome;

#[derive(Debug, Clone)]
pub struct PersonListing {
    pub profile: Profile,
    pub user: User,
    pub phones: Vec<Phone>,
}

/// The people list. With a query, matches first/last name; exactly one
/// match redirects. Without one, everyone.
pub fn list_people(
    conn: &Connection,
    ctx: &RequestContext,
    query: Option<&str>,
) -> CrmResult<ListOutcome<PersonListing>> {
    ctx.require(Permission::ViewProfile)?;

    let query = query.map(str::trim).filter(|q| !q.is_empty());
    let pairs = match query {
        Some(q) => profile_repo::search_by_name(conn, q)?,
        None => profile_repo::find_all_with_users(conn)?,
    };

    let mut listings = Vec::new();
    for (profile, user) in pairs {
        let phones = profile_repo::find_phones(conn, profile.id)?;
        listings.push(PersonListing {
            profile,
            user,
            phones,
        });
    }

    Ok(ListOutcome::from_rows(query.is_some(), listings))
}

#[derive(Debug, Clone)]
pub struct PersonDetail {
    pub profile: Profile,
    pub user: User,
    pub phones: Vec<Phone>,
    /// The ten most recent interactions the person participates in.
    pub interactions: Vec<Interaction>,
}

pub fn person_detail(
    conn: &Connection,
    ctx: &RequestContext,
    profile_id: Id<Profile>,
) -> CrmResult<PersonDetail> {
    ctx.require(Permission::ViewProfile)?;

    let (profile, user) =
        profile_repo::find_with_user(conn, profile_id)?.ok_or_else(|| CrmError::NotFound {
            entity_type: "Profile".into(),
            id: profile_id.to_string(),
        })?;

    let phones = profile_repo::find_phones(conn, profile.id)?;
    let interactions = interaction_repo::find_recent_for_contact(conn, user.id, 10)?;

    Ok(PersonDetail {
        profile,
        user,
        phones,
        interactions,
    })
}
