//! Everything a signed-in session works with.
//!
//! A [`Workspace`] owns one [`SharedRepository`] per entity type and the
//! gateways behind them. Pages borrow the workspace, so any number of pages
//! can be open at once and all of them see the same collections.

use crate::client::{Client, EmployeesApi};
use crate::gateway::LocalStore;
use crate::navigation::{NavigationShell, Overview};
use crate::page::EntityPage;
use crate::payroll::deduction::Deduction;
use crate::payroll::employee::Employee;
use crate::payroll::hours_entry::{HoursEntry, HoursLedger};
use crate::payroll::payroll_cycle::PayrollCycle;
use crate::payroll::report::PayrollReport;
use crate::repository::SharedRepository;
use crate::session::Session;

pub type EmployeePage<'a> = EntityPage<Employee, EmployeesApi<'a>>;
pub type DeductionPage<'a> = EntityPage<Deduction, &'a LocalStore<Deduction>>;
pub type PayrollCyclePage<'a> = EntityPage<PayrollCycle, &'a LocalStore<PayrollCycle>>;
pub type HoursPage<'a> = EntityPage<HoursEntry, &'a HoursLedger>;

#[derive(Debug)]
pub struct Workspace {
    client: Client,
    shell: NavigationShell,
    employees: SharedRepository<Employee>,
    deductions: SharedRepository<Deduction>,
    payroll_cycles: SharedRepository<PayrollCycle>,
    hours: SharedRepository<HoursEntry>,
    deduction_store: LocalStore<Deduction>,
    payroll_cycle_store: LocalStore<PayrollCycle>,
    hours_ledger: HoursLedger,
}

impl Workspace {
    /// A workspace whose local-only pages start from their sample rows.
    #[must_use]
    pub fn new(client: Client, session: Session) -> Self {
        let employees = SharedRepository::new();
        Self {
            client,
            shell: NavigationShell::new(session),
            hours_ledger: HoursLedger::new(employees.clone()),
            employees,
            deductions: SharedRepository::new(),
            payroll_cycles: SharedRepository::new(),
            hours: SharedRepository::new(),
            deduction_store: LocalStore::with_rows(Deduction::samples()),
            payroll_cycle_store: LocalStore::with_rows(PayrollCycle::samples()),
        }
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn shell(&self) -> &NavigationShell {
        &self.shell
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.shell.session()
    }

    #[must_use]
    pub fn employees(&self) -> &SharedRepository<Employee> {
        &self.employees
    }

    #[must_use]
    pub fn deductions(&self) -> &SharedRepository<Deduction> {
        &self.deductions
    }

    #[must_use]
    pub fn payroll_cycles(&self) -> &SharedRepository<PayrollCycle> {
        &self.payroll_cycles
    }

    #[must_use]
    pub fn hours(&self) -> &SharedRepository<HoursEntry> {
        &self.hours
    }

    pub fn deduction_store_mut(&mut self) -> &mut LocalStore<Deduction> {
        &mut self.deduction_store
    }

    pub fn payroll_cycle_store_mut(&mut self) -> &mut LocalStore<PayrollCycle> {
        &mut self.payroll_cycle_store
    }

    #[must_use]
    pub fn employee_page(&self) -> EmployeePage<'_> {
        EntityPage::new(self.client.employees(), self.employees.clone())
    }

    #[must_use]
    pub fn deduction_page(&self) -> DeductionPage<'_> {
        EntityPage::new(&self.deduction_store, self.deductions.clone())
    }

    #[must_use]
    pub fn payroll_cycle_page(&self) -> PayrollCyclePage<'_> {
        EntityPage::new(&self.payroll_cycle_store, self.payroll_cycles.clone())
    }

    #[must_use]
    pub fn hours_page(&self) -> HoursPage<'_> {
        EntityPage::new(&self.hours_ledger, self.hours.clone())
    }

    #[must_use]
    pub fn overview(&self) -> Overview {
        Overview::collect(&self.employees, &self.payroll_cycles)
    }

    #[must_use]
    pub fn payroll_report(&self) -> PayrollReport {
        PayrollReport::default()
    }
}
