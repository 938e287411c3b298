//! Permission collaborator seam. The host application decides who may do
//! what; core operations consult an explicit [`RequestContext`] value passed
//! in per call, never ambient state.

use std::collections::HashSet;

use crate::error::{CrmError, CrmResult};
use crate::model::{Id, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewProfile,
    ChangeProfile,
    ViewBusiness,
    ChangeBusiness,
    ViewProject,
    ChangeProject,
    ViewInteraction,
    ChangeInteraction,
    DeleteInteraction,
}

impl Permission {
    /// Stable codename, also used in denial messages.
    pub fn code(&self) -> &'static str {
        match self {
            Permission::ViewProfile => "crm.view_profile",
            Permission::ChangeProfile => "crm.change_profile",
            Permission::ViewBusiness => "crm.view_business",
            Permission::ChangeBusiness => "crm.change_business",
            Permission::ViewProject => "crm.view_project",
            Permission::ChangeProject => "crm.change_project",
            Permission::ViewInteraction => "crm.view_interaction",
            Permission::ChangeInteraction => "crm.change_interaction",
            Permission::DeleteInteraction => "crm.delete_interaction",
        }
    }
}

/// Answers permission questions for a user. Implemented by the host
/// application's authorization layer.
pub trait PermissionCheck {
    fn has_permission(&self, user: Id<User>, permission: Permission) -> bool;
}

/// The acting user plus their permission checker, threaded through every
/// public operation.
pub struct RequestContext<'a> {
    actor: Id<User>,
    permissions: &'a dyn PermissionCheck,
}

impl<'a> RequestContext<'a> {
    pub fn new(actor: Id<User>, permissions: &'a dyn PermissionCheck) -> Self {
        Self { actor, permissions }
    }

    pub fn actor(&self) -> Id<User> {
        self.actor
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.has_permission(self.actor, permission)
    }

    /// Denial surfaces before any core logic runs.
    pub fn require(&self, permission: Permission) -> CrmResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(CrmError::PermissionDenied {
                permission: permission.code(),
            })
        }
    }
}

/// Grants everything. For trusted internal callers and tests.
pub struct AllowAll;

impl PermissionCheck for AllowAll {
    fn has_permission(&self, _user: Id<User>, _permission: Permission) -> bool {
        true
    }
}

/// Grants exactly the listed permissions to every user.
pub struct StaticPermissions {
    grants: HashSet<Permission>,
}

impl StaticPermissions {
    pub fn new(grants: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            grants: grants.into_iter().collect(),
        }
    }
}

impl PermissionCheck for StaticPermissions {
    fn has_permission(&self, _user: Id<User>, permission: Permission) -> bool {
        self.grants.contains(&permission)
    }
}
