//! Optional ledger/billing collaborator. The capability is injected at
//! startup; when the host has no ledger it injects [`NoLedger`] and the
//! views render without exchange data. Absence is not an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Business, Id, Project, User};

/// Read-only view of a ledger exchange tied to a business or project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub id: Id<Exchange>,
    pub kind: String,
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub deliverable: bool,
}

pub trait LedgerProvider {
    /// Exchanges recorded against a business.
    fn business_exchanges(&self, business_id: Id<Business>) -> Vec<Exchange>;

    /// Exchanges recorded against one of a business's projects.
    fn project_exchanges(&self, project_id: Id<Project>) -> Vec<Exchange>;

    /// Recent exchanges for businesses the user is a contact of.
    fn user_exchanges(&self, user_id: Id<User>) -> Vec<Exchange>;
}

/// The substitute wired in when no ledger module is installed.
pub struct NoLedger;

impl LedgerProvider for NoLedger {
    fn business_exchanges(&self, _business_id: Id<Business>) -> Vec<Exchange> {
        Vec::new()
    }

    fn project_exchanges(&self, _project_id: Id<Project>) -> Vec<Exchange> {
        Vec::new()
    }

    fn user_exchanges(&self, _user_id: Id<User>) -> Vec<Exchange> {
        Vec::new()
    }
}
