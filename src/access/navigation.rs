//! Navigation entries and what gates them

use serde::Serialize;

use super::Permission;

/// One navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    /// Permission the role must hold
    pub permission: Permission,
    /// Module that must not be disabled; `None` for core sections
    pub module: Option<&'static str>,
}

impl NavItem {
    pub const fn new(
        key: &'static str,
        label: &'static str,
        path: &'static str,
        permission: Permission,
        module: Option<&'static str>,
    ) -> Self {
        Self {
            key,
            label,
            path,
            permission,
            module,
        }
    }
}

/// The application's sections in display order
pub const NAVIGATION: &[NavItem] = &[
    NavItem::new("dashboard", "Dashboard", "/", Permission::ViewDashboard, None),
    NavItem::new("time_tracking", "Time Tracking", "/time", Permission::TrackTime, Some("time_tracking")),
    NavItem::new("my_time_entries", "My Time Entries", "/time/mine", Permission::ViewOwnTimeEntries, Some("time_tracking")),
    NavItem::new("all_time_entries", "All Time Entries", "/time/all", Permission::ViewAllTimeEntries, Some("time_tracking")),
    NavItem::new("inventory", "Inventory", "/inventory", Permission::ViewInventory, Some("inventory")),
    NavItem::new("tickets", "Tickets", "/tickets", Permission::ViewOwnTickets, Some("tickets")),
    NavItem::new("all_tickets", "All Tickets", "/tickets/all", Permission::ViewAllTickets, Some("tickets")),
    NavItem::new("invoices", "Invoices", "/invoices", Permission::ManageInvoices, Some("invoices")),
    NavItem::new("finance", "Finance", "/finance", Permission::ViewFinance, Some("finance")),
    NavItem::new("users", "Users", "/users", Permission::ManageUsers, None),
    NavItem::new("email_templates", "Email Templates", "/settings/email", Permission::ManageEmailTemplates, Some("email")),
    NavItem::new("modules", "Modules", "/settings/modules", Permission::ManageModules, None),
];
