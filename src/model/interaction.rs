use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::project::Project;
use super::user::User;

/// What kind of communication an interaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    Email,
    PhoneCall,
    Meeting,
    Note,
}

impl InteractionKind {
    pub const ALL: &'static [InteractionKind] = &[
        InteractionKind::Email,
        InteractionKind::PhoneCall,
        InteractionKind::Meeting,
        InteractionKind::Note,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            InteractionKind::Email => "Email",
            InteractionKind::PhoneCall => "Phone Call",
            InteractionKind::Meeting => "Meeting",
            InteractionKind::Note => "Note",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Email" => Some(InteractionKind::Email),
            "PhoneCall" => Some(InteractionKind::PhoneCall),
            "Meeting" => Some(InteractionKind::Meeting),
            "Note" => Some(InteractionKind::Note),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            InteractionKind::Email => "Email",
            InteractionKind::PhoneCall => "PhoneCall",
            InteractionKind::Meeting => "Meeting",
            InteractionKind::Note => "Note",
        }
    }
}

/// A logged communication event tied to one or more contacts and optionally
/// a project. Open (completed=false) flips to completed on save; there is no
/// reverse-transition guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Id<Interaction>,
    pub date: NaiveDate,
    pub kind: InteractionKind,
    pub completed: bool,
    pub memo: Option<String>,
    pub project_id: Option<Id<Project>>,
    pub contacts: Vec<Id<User>>,
}

impl Interaction {
    pub fn create(date: NaiveDate, kind: InteractionKind) -> Self {
        Self {
            id: Id::generate(),
            date,
            kind,
            completed: false,
            memo: None,
            project_id: None,
            contacts: Vec::new(),
        }
    }
}
