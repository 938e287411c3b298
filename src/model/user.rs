use serde::{Deserialize, Serialize};

use super::ids::Id;

/// An account identity. Users are never hard-deleted in the core flows;
/// everything else in the system references them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id<User>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    pub fn create(first_name: String, last_name: String, email: String) -> Self {
        Self {
            id: Id::generate(),
            first_name,
            last_name,
            email,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
