//! Roles, permission tokens and the fixed table between them

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Permission tokens a role can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    TrackTime,
    ViewOwnTimeEntries,
    ViewAllTimeEntries,
    EditTimeEntries,
    ViewInventory,
    BookInventory,
    ManageInventory,
    ViewOwnTickets,
    ViewAllTickets,
    CreateTickets,
    ManageInvoices,
    ViewFinance,
    ManageUsers,
    ManageEmailTemplates,
    ManageModules,
}

impl Permission {
    pub const ALL: [Permission; 16] = [
        Permission::ViewDashboard,
        Permission::TrackTime,
        Permission::ViewOwnTimeEntries,
        Permission::ViewAllTimeEntries,
        Permission::EditTimeEntries,
        Permission::ViewInventory,
        Permission::BookInventory,
        Permission::ManageInventory,
        Permission::ViewOwnTickets,
        Permission::ViewAllTickets,
        Permission::CreateTickets,
        Permission::ManageInvoices,
        Permission::ViewFinance,
        Permission::ManageUsers,
        Permission::ManageEmailTemplates,
        Permission::ManageModules,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::TrackTime => "track_time",
            Permission::ViewOwnTimeEntries => "view_own_time_entries",
            Permission::ViewAllTimeEntries => "view_all_time_entries",
            Permission::EditTimeEntries => "edit_time_entries",
            Permission::ViewInventory => "view_inventory",
            Permission::BookInventory => "book_inventory",
            Permission::ManageInventory => "manage_inventory",
            Permission::ViewOwnTickets => "view_own_tickets",
            Permission::ViewAllTickets => "view_all_tickets",
            Permission::CreateTickets => "create_tickets",
            Permission::ManageInvoices => "manage_invoices",
            Permission::ViewFinance => "view_finance",
            Permission::ManageUsers => "manage_users",
            Permission::ManageEmailTemplates => "manage_email_templates",
            Permission::ManageModules => "manage_modules",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission: {}", s))
    }
}

/// Session roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    ElevatedAdmin,
    #[serde(rename = "office")]
    OfficeStaff,
    #[serde(rename = "worker")]
    FieldWorker,
    #[serde(rename = "contractor")]
    Contractor,
    #[serde(rename = "super_admin")]
    SuperAdmin,
}

const SUPER_ADMIN: &[Permission] = &Permission::ALL;

// Everything except seeing other people's tickets.
const ELEVATED_ADMIN: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::TrackTime,
    Permission::ViewOwnTimeEntries,
    Permission::ViewAllTimeEntries,
    Permission::EditTimeEntries,
    Permission::ViewInventory,
    Permission::BookInventory,
    Permission::ManageInventory,
    Permission::ViewOwnTickets,
    Permission::CreateTickets,
    Permission::ManageInvoices,
    Permission::ViewFinance,
    Permission::ManageUsers,
    Permission::ManageEmailTemplates,
    Permission::ManageModules,
];

const OFFICE_STAFF: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::TrackTime,
    Permission::ViewOwnTimeEntries,
    Permission::ViewAllTimeEntries,
    Permission::EditTimeEntries,
    Permission::ViewInventory,
    Permission::BookInventory,
    Permission::ManageInventory,
    Permission::ViewOwnTickets,
    Permission::CreateTickets,
    Permission::ManageInvoices,
];

const FIELD_WORKER: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::TrackTime,
    Permission::ViewOwnTimeEntries,
    Permission::ViewInventory,
    Permission::BookInventory,
    Permission::ViewOwnTickets,
    Permission::CreateTickets,
];

const CONTRACTOR: &[Permission] = &[
    Permission::TrackTime,
    Permission::ViewOwnTimeEntries,
    Permission::ViewOwnTickets,
    Permission::CreateTickets,
];

impl Role {
    pub const ALL: [Role; 5] = [
        Role::ElevatedAdmin,
        Role::OfficeStaff,
        Role::FieldWorker,
        Role::Contractor,
        Role::SuperAdmin,
    ];

    /// The fixed permission set of this role
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::ElevatedAdmin => ELEVATED_ADMIN,
            Role::OfficeStaff => OFFICE_STAFF,
            Role::FieldWorker => FIELD_WORKER,
            Role::Contractor => CONTRACTOR,
            Role::SuperAdmin => SUPER_ADMIN,
        }
    }

    pub fn has(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::ElevatedAdmin => "admin",
            Role::OfficeStaff => "office",
            Role::FieldWorker => "worker",
            Role::Contractor => "contractor",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}
