use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::user::User;

/// Extended attributes of a user beyond the core account identity.
/// One-to-one with [`User`] and owned by it for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Id<Profile>,
    pub user_id: Id<User>,
    pub notes: Option<String>,
    pub picture: Option<String>,
}

impl Profile {
    pub fn create(user_id: Id<User>) -> Self {
        Self {
            id: Id::generate(),
            user_id,
            notes: None,
            picture: None,
        }
    }
}

/// The slot a phone number occupies on a profile. A profile holds at most
/// one number per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhoneType {
    Home,
    Work,
    Mobile,
    Fax,
}

impl PhoneType {
    pub const ALL: &'static [PhoneType] = &[
        PhoneType::Home,
        PhoneType::Work,
        PhoneType::Mobile,
        PhoneType::Fax,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PhoneType::Home => "Home",
            PhoneType::Work => "Work",
            PhoneType::Mobile => "Mobile",
            PhoneType::Fax => "Fax",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "home" => Some(PhoneType::Home),
            "work" => Some(PhoneType::Work),
            "mobile" => Some(PhoneType::Mobile),
            "fax" => Some(PhoneType::Fax),
            _ => None,
        }
    }

    /// Convert to database string representation. Doubles as the field key
    /// in per-field validation reports.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PhoneType::Home => "home",
            PhoneType::Work => "work",
            PhoneType::Mobile => "mobile",
            PhoneType::Fax => "fax",
        }
    }
}

/// A phone number on a profile. Cleared numbers are deleted rather than
/// stored blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phone {
    pub id: Id<Phone>,
    pub profile_id: Id<Profile>,
    pub phone_type: PhoneType,
    pub number: String,
}

impl Phone {
    pub fn create(profile_id: Id<Profile>, phone_type: PhoneType, number: String) -> Self {
        Self {
            id: Id::generate(),
            profile_id,
            phone_type,
            number,
        }
    }
}
