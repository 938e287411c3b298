use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::{profile_repo, user_repo};
use crate::error::{CrmError, CrmResult, FieldErrors};
use crate::model::{Id, Phone, PhoneType, Profile, User};
use crate::notify::{MessageDescriptor, Notifier};
use crate::ops::SaveOutcome;
use crate::validation::{self, trim_optional};

#[derive(Debug, Clone, Default)]
pub struct PersonFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub notes: Option<String>,
    pub picture: Option<String>,
}

/// One composite save: the account identity, its profile, and one phone slot
/// per submitted type. A blank phone number clears the stored slot.
#[derive(Debug, Clone, Default)]
pub struct PersonSaveRequest {
    /// `Some` edits the existing person; `None` creates a new one.
    pub profile_id: Option<Id<Profile>>,
    pub person: PersonFields,
    pub profile: ProfileFields,
    pub phones: Vec<(PhoneType, String)>,
    /// Welcome message sent on first-time creation. Absent or empty: no
    /// notification is attempted.
    pub welcome: Option<MessageDescriptor>,
}

#[derive(Debug, Clone)]
pub struct PersonRecord {
    pub user: User,
    pub profile: Profile,
    pub phones: Vec<Phone>,
    pub created: bool,
}

/// Persist a person, their profile, and their phones as one unit, or
/// nothing. Field-level problems come back as `SaveOutcome::Invalid` with
/// no writes performed; datastore failures roll the whole save back.
pub fn save_person(
    conn: &mut Connection,
    ctx: &RequestContext,
    request: PersonSaveRequest,
    notifier: &dyn Notifier,
) -> CrmResult<SaveOutcome<PersonRecord>> {
    ctx.require(Permission::ChangeProfile)?;

    let tx = conn.transaction()?;

    let existing = match request.profile_id {
        Some(profile_id) => Some(
            profile_repo::find_with_user(&tx, profile_id)?.ok_or_else(|| CrmError::NotFound {
                entity_type: "Profile".into(),
                id: profile_id.to_string(),
            })?,
        ),
        None => None,
    };

    let mut errors = FieldErrors::new();
    let first_name = errors.check("first_name", validation::non_blank(&request.person.first_name));
    let last_name = errors.check("last_name", validation::non_blank(&request.person.last_name));
    let email = errors.check("email", validation::email_shape(&request.person.email));

    // Uniqueness is enforced on insert only; edits keep their row.
    if existing.is_none() {
        if let Some(email) = &email {
            if user_repo::email_taken(&tx, email)? {
                errors.add("email", "a user with that e-mail address already exists");
            }
        }
    }

    // Each phone slot validates independently, keyed by its type.
    let mut phone_changes: Vec<(PhoneType, Option<String>)> = Vec::new();
    for (phone_type, number) in &request.phones {
        let trimmed = trim_optional(Some(number));
        if let Some(number) = &trimmed {
            if let Err(message) = validation::phone_shape(number) {
                errors.add(phone_type.to_db_str(), message);
                continue;
            }
        }
        phone_changes.push((*phone_type, trimmed));
    }

    if !errors.is_empty() {
        // Transaction dropped without commit: no writes reach the store.
        return Ok(SaveOutcome::Invalid(errors));
    }
    let (Some(first_name), Some(last_name), Some(email)) = (first_name, last_name, email) else {
        return Ok(SaveOutcome::Invalid(errors));
    };

    let created = existing.is_none();
    let (mut profile, mut user) = match existing {
        Some((profile, user)) => (profile, user),
        None => {
            let user = User::create(first_name.clone(), last_name.clone(), email.clone());
            (Profile::create(user.id), user)
        }
    };

    user.first_name = first_name;
    user.last_name = last_name;
    user.email = email;
    profile.notes = trim_optional(request.profile.notes.as_deref());
    profile.picture = trim_optional(request.profile.picture.as_deref());

    if created {
        user_repo::insert(&tx, &user)?;
        profile_repo::insert(&tx, &profile)?;
    } else {
        user_repo::update(&tx, &user)?;
        profile_repo::update(&tx, &profile)?;
    }

    for (phone_type, number) in phone_changes {
        match number {
            Some(number) => {
                profile_repo::upsert_phone(&tx, &Phone::create(profile.id, phone_type, number))?
            }
            // Cleared number: the stored slot goes away.
            None => profile_repo::delete_phone(&tx, profile.id, phone_type)?,
        }
    }

    let phones = profile_repo::find_phones(&tx, profile.id)?;
    tx.commit()?;

    if created {
        tracing::info!(profile_id = %profile.id, "person created");
        send_welcome(notifier, &user, request.welcome.as_ref());
    }

    Ok(SaveOutcome::Saved(PersonRecord {
        user,
        profile,
        phones,
        created,
    }))
}

/// At most one notification per creation; delivery problems are logged and
/// never undo the committed save.
fn send_welcome(notifier: &dyn Notifier, user: &User, descriptor: Option<&MessageDescriptor>) {
    let Some(descriptor) = descriptor else {
        return;
    };
    if descriptor.is_empty() {
        return;
    }
    if let Err(e) = notifier.send(descriptor, &user.email) {
        tracing::warn!(recipient = %user.email, error = %e, "welcome notification failed");
    }
}
