//! Page catalogue, titles and dashboard content for a session.

use crate::payroll::employee::Employee;
use crate::payroll::payroll_cycle::PayrollCycle;
use crate::repository::SharedRepository;
use crate::session::Session;

pub const PRODUCT_NAME: &str = "HonduPay";
pub const LOGIN_PATH: &str = "/login";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub admin_only: bool,
}

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        label: "Dashboard",
        path: "/dashboard",
        admin_only: false,
    },
    NavItem {
        label: "Employees",
        path: "/employees",
        admin_only: true,
    },
    NavItem {
        label: "Payroll Cycles",
        path: "/payroll-cycles",
        admin_only: true,
    },
    NavItem {
        label: "Deductions",
        path: "/deductions",
        admin_only: true,
    },
    NavItem {
        label: "Hours Input",
        path: "/hours-input",
        admin_only: false,
    },
    NavItem {
        label: "Payroll Reports",
        path: "/payroll-reports",
        admin_only: true,
    },
];

/// A quick-action card on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardCard {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

pub const ADMIN_CARDS: &[DashboardCard] = &[
    DashboardCard {
        title: "Employee Management",
        description: "Manage employee information",
        link: "/employees",
    },
    DashboardCard {
        title: "Payroll Cycles",
        description: "Manage payroll cycles",
        link: "/payroll-cycles",
    },
    DashboardCard {
        title: "Deductions Management",
        description: "Manage deductions",
        link: "/deductions",
    },
    DashboardCard {
        title: "Generate Payroll Reports",
        description: "Generate and view reports",
        link: "/payroll-reports",
    },
];

pub const STAFF_CARDS: &[DashboardCard] = &[
    DashboardCard {
        title: "Hours Input",
        description: "Input your work hours",
        link: "/hours-input",
    },
    DashboardCard {
        title: "View Payroll Details",
        description: "View your payroll information",
        link: "/payroll-details",
    },
    DashboardCard {
        title: "Generate Payslips",
        description: "Generate and view your payslips",
        link: "/payslips",
    },
];

/// Figures shown in the dashboard overview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overview {
    pub total_employees: usize,
    /// Cycles still pending approval.
    pub active_payroll_cycles: usize,
}

impl Overview {
    #[must_use]
    pub fn collect(
        employees: &SharedRepository<Employee>,
        cycles: &SharedRepository<PayrollCycle>,
    ) -> Self {
        Self {
            total_employees: employees.len(),
            active_payroll_cycles: cycles
                .read(|r| r.items().iter().filter(|c| c.is_pending()).count()),
        }
    }
}

/// The sidebar and header of a session.
#[derive(Clone, Debug)]
pub struct NavigationShell {
    session: Session,
}

impl NavigationShell {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Entries shown in the sidebar, in catalogue order.
    #[must_use]
    pub fn visible_items(&self) -> Vec<&'static NavItem> {
        NAV_ITEMS
            .iter()
            .filter(|item| self.session.is_admin() || !item.admin_only)
            .collect()
    }

    #[must_use]
    pub fn is_visible(&self, path: &str) -> bool {
        self.visible_items().iter().any(|item| item.path == path)
    }

    /// Header title for `path`; unknown paths show the product name.
    #[must_use]
    pub fn title_for(path: &str) -> &'static str {
        NAV_ITEMS
            .iter()
            .find(|item| item.path == path)
            .map_or(PRODUCT_NAME, |item| item.label)
    }

    #[must_use]
    pub fn dashboard_cards(&self) -> &'static [DashboardCard] {
        if self.session.is_admin() { ADMIN_CARDS } else { STAFF_CARDS }
    }

    /// Ends the session and returns the path to show next.
    #[must_use]
    pub fn logout(self) -> &'static str {
        info!(email = %self.session.email(), "session closed");
        LOGIN_PATH
    }
}
