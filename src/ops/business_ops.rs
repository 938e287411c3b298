use rusqlite::Connection;

use crate::access::{Permission, RequestContext};
use crate::db::business_repo;
use crate::error::{CrmError, CrmResult, FieldErrors};
use crate::model::{Address, Business, Id};
use crate::ops::SaveOutcome;
use crate::validation::{self, trim_optional};

#[derive(Debug, Clone, Default)]
pub struct BusinessFields {
    pub name: String,
    pub notes: Option<String>,
    pub business_types: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BusinessSaveRequest {
    pub business_id: Option<Id<Business>>,
    pub business: BusinessFields,
    pub address: Address,
}

#[derive(Debug, Clone)]
pub struct BusinessRecord {
    pub business: Business,
    pub address: Option<Address>,
    pub created: bool,
}

/// Persist a business together with its type tags and, when any address
/// field carries data, its address, as one unit. An all-blank address is
/// skipped entirely and never disturbs a stored one.
pub fn save_business(
    conn: &mut Connection,
    ctx: &RequestContext,
    request: BusinessSaveRequest,
) -> CrmResult<SaveOutcome<BusinessRecord>> {
    ctx.require(Permission::ChangeBusiness)?;

    let tx = conn.transaction()?;

    let existing = match request.business_id {
        Some(business_id) => Some(
            business_repo::find_by_id(&tx, business_id)?.ok_or_else(|| CrmError::NotFound {
                entity_type: "Business".into(),
                id: business_id.to_string(),
            })?,
        ),
        None => None,
    };

    let mut errors = FieldErrors::new();
    let name = errors.check("name", validation::non_blank(&request.business.name));

    let address_has_data = request.address.has_data();
    let mut address = request.address.clone();
    if address_has_data {
        if let Some(zip) = errors.check("zip", validation::zip_shape(&request.address.zip)) {
            address.zip = zip.unwrap_or_default();
        }
        address.street = address.street.trim().to_string();
        address.city = address.city.trim().to_string();
        address.state = address.state.trim().to_string();
    }

    if !errors.is_empty() {
        return Ok(SaveOutcome::Invalid(errors));
    }
    let Some(name) = name else {
        return Ok(SaveOutcome::Invalid(errors));
    };

    let created = existing.is_none();
    let mut business = existing.unwrap_or_else(|| Business::create(name.clone()));
    business.name = name;
    business.notes = trim_optional(request.business.notes.as_deref());
    business.business_types = clean_tags(request.business.business_types);

    if created {
        business_repo::insert(&tx, &business)?;
    } else {
        business_repo::update(&tx, &business)?;
    }

    if address_has_data {
        business_repo::upsert_address(&tx, business.id, &address)?;
    }

    let address = business_repo::find_address(&tx, business.id)?;
    tx.commit()?;

    if created {
        tracing::info!(business_id = %business.id, "business created");
    }

    Ok(SaveOutcome::Saved(BusinessRecord {
        business,
        address,
        created,
    }))
}

/// Trim, drop blanks, and de-duplicate while keeping submission order.
pub(crate) fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}
