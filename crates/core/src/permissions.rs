//! Role-to-operation permission table.
//!
//! Handlers never compare role names directly; they ask whether the caller's
//! role holds a [`Permission`]. The table below is the single place where
//! the mapping lives.

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_MANAGER};

const ANY_ROLE: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_EMPLOYEE];
const ADMIN_OR_MANAGER: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];
const ADMIN_ONLY: &[&str] = &[ROLE_ADMIN];

/// An operation gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewAssets,
    CreateAsset,
    UpdateAsset,
    DeleteAsset,
    ImportAssets,
    ExportAssets,
    ViewEmployees,
    ManageEmployees,
    DeleteEmployee,
    ManageAssignments,
    ViewSettings,
    UpdateSettings,
    ViewAuditLog,
    ViewDashboard,
    ManageUsers,
}

impl Permission {
    /// Roles that hold this permission.
    pub fn allowed_roles(self) -> &'static [&'static str] {
        match self {
            Self::ViewAssets
            | Self::ExportAssets
            | Self::ViewEmployees
            | Self::ViewSettings
            | Self::ViewDashboard => ANY_ROLE,

            Self::CreateAsset
            | Self::UpdateAsset
            | Self::ImportAssets
            | Self::ManageEmployees
            | Self::ManageAssignments
            | Self::ViewAuditLog => ADMIN_OR_MANAGER,

            Self::DeleteAsset | Self::DeleteEmployee | Self::UpdateSettings | Self::ManageUsers => {
                ADMIN_ONLY
            }
        }
    }

    pub fn is_granted_to(self, role: &str) -> bool {
        self.allowed_roles().contains(&role)
    }

    /// Short description used in the `Forbidden` message.
    pub fn describe(self) -> &'static str {
        match self {
            Self::ViewAssets => "view assets",
            Self::CreateAsset => "create assets",
            Self::UpdateAsset => "update assets",
            Self::DeleteAsset => "delete assets",
            Self::ImportAssets => "import assets",
            Self::ExportAssets => "export assets",
            Self::ViewEmployees => "view employees",
            Self::ManageEmployees => "manage employees",
            Self::DeleteEmployee => "delete employees",
            Self::ManageAssignments => "manage assignments",
            Self::ViewSettings => "view settings",
            Self::UpdateSettings => "update settings",
            Self::ViewAuditLog => "view the audit log",
            Self::ViewDashboard => "view the dashboard",
            Self::ManageUsers => "manage users",
        }
    }
}

/// Check that `role` holds `permission`.
pub fn authorize(role: &str, permission: Permission) -> Result<(), CoreError> {
    if permission.is_granted_to(role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' is not allowed to {}",
            permission.describe()
        )))
    }
}
