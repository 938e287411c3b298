use chrono::NaiveDate;
use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::{interaction_repo, profile_repo, project_repo};
use crate::error::{CrmError, CrmResult};
use crate::model::{Id, Interaction, InteractionKind, Profile, Project, User};
use crate::validation::trim_optional;

#[derive(Debug, Clone)]
pub struct InteractionFields {
    pub date: NaiveDate,
    pub kind: InteractionKind,
    pub completed: bool,
    pub memo: Option<String>,
    pub project_id: Option<Id<Project>>,
    pub contacts: Vec<Id<User>>,
}

#[derive(Debug, Clone)]
pub struct InteractionSaveRequest {
    pub interaction_id: Option<Id<Interaction>>,
    /// The person the interaction is being logged about. On creation their
    /// user joins the contact set alongside the acting user.
    pub subject: Option<Id<Profile>>,
    pub fields: InteractionFields,
}

/// Insert or update an interaction. The completed flag is a plain field
/// flip in either direction.
pub fn save_interaction(
    conn: &mut Connection,
    ctx: &RequestContext,
    request: InteractionSaveRequest,
) -> CrmResult<Interaction> {
    ctx.require(Permission::ChangeInteraction)?;

    let tx = conn.transaction()?;

    if let Some(project_id) = request.fields.project_id {
        project_repo::find_by_id(&tx, project_id)?.ok_or_else(|| CrmError::NotFound {
            entity_type: "Project".into(),
            id: project_id.to_string(),
        })?;
    }

    let subject_user = match request.subject {
        Some(profile_id) => {
            let (profile, _) =
                profile_repo::find_with_user(&tx, profile_id)?.ok_or_else(|| {
                    CrmError::NotFound {
                        entity_type: "Profile".into(),
                        id: profile_id.to_string(),
                    }
                })?;
            Some(profile.user_id)
        }
        None => None,
    };

    let existing = match request.interaction_id {
        Some(interaction_id) => Some(
            interaction_repo::find_by_id(&tx, interaction_id)?.ok_or_else(|| {
                CrmError::NotFound {
                    entity_type: "Interaction".into(),
                    id: interaction_id.to_string(),
                }
            })?,
        ),
        None => None,
    };

    let created = existing.is_none();
    let mut interaction = existing
        .unwrap_or_else(|| Interaction::create(request.fields.date, request.fields.kind));

    interaction.date = request.fields.date;
    interaction.kind = request.fields.kind;
    interaction.completed = request.fields.completed;
    interaction.memo = trim_optional(request.fields.memo.as_deref());
    interaction.project_id = request.fields.project_id;
    interaction.contacts = dedup_contacts(request.fields.contacts);

    if created {
        // The subject and the acting user are always on a new interaction's
        // contact list.
        if let Some(user_id) = subject_user {
            if !interaction.contacts.contains(&user_id) {
                interaction.contacts.push(user_id);
            }
        }
        if !interaction.contacts.contains(&ctx.actor()) {
            interaction.contacts.push(ctx.actor());
        }
        interaction_repo::insert(&tx, &interaction)?;
    } else {
        interaction_repo::update(&tx, &interaction)?;
    }

    tx.commit()?;
    Ok(interaction)
}

pub fn delete_interaction(
    conn: &Connection,
    ctx: &RequestContext,
    interaction_id: Id<Interaction>,
) -> CrmResult<()> {
    ctx.require(Permission::DeleteInteraction)?;

    interaction_repo::find_by_id(conn, interaction_id)?.ok_or_else(|| CrmError::NotFound {
        entity_type: "Interaction".into(),
        id: interaction_id.to_string(),
    })?;

    interaction_repo::delete(conn, interaction_id)
}

fn dedup_contacts(contacts: Vec<Id<User>>) -> Vec<Id<User>> {
    let mut deduped: Vec<Id<User>> = Vec::new();
    for user_id in contacts {
        if !deduped.contains(&user_id) {
            deduped.push(user_id);
        }
    }
    deduped
}
