use serde::{Deserialize, Serialize};

use super::ids::Id;

/// A business: has many projects, many contact users, and an optional
/// address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: Id<Business>,
    pub name: String,
    pub notes: Option<String>,
    pub business_types: Vec<String>,
}

impl Business {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            notes: None,
            business_types: Vec::new(),
        }
    }
}

/// A structured postal address, owned by at most one business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// Whether the address carries enough data to be worth persisting.
    /// A state on its own does not create an address.
    pub fn has_data(&self) -> bool {
        [&self.street, &self.city, &self.zip]
            .iter()
            .any(|field| !field.trim().is_empty())
    }
}
