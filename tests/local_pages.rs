#[macro_use]
extern crate tracing;


use hondupay::payroll::hours_entry::{UNKNOWN_EMPLOYEE_MESSAGE, employee_label};
use hondupay::payroll::payroll_cycle::DATE_ORDER_MESSAGE;
use hondupay::{CycleStatus, Error, FormValues, PageState, RecordId, Role, Session, Workspace};
use miette::Result;
use rust_decimal_macros::dec;
use time::macros::date;

use test_utils::{MockStore, employee_row};

async fn workspace(role: Role) -> (MockStore, Workspace) {
    let store = MockStore::spawn().await;
    let workspace = Workspace::new(store.client(), Session::new("user@hondupay.hn", role));
    (store, workspace)
}

#[tokio::test]
async fn deductions_start_from_samples_and_continue_identifiers() -> Result<()> {
    test_utils::do_setup();
    let (_store, workspace) = workspace(Role::Admin).await;
    let mut page = workspace.deduction_page();
    page.load().await;
    assert_eq!(page.visible().len(), 2);

    page.fill(
        FormValues::new()
            .with("name", "Cooperativa")
            .with("amount", "75.25")
            .with("frequency", "Biweekly"),
    );
    let created = page.submit().await?;
    assert_eq!(created.id, RecordId(3));
    assert_eq!(created.amount, dec!(75.25));

    page.set_search("coop");
    assert_eq!(page.visible(), vec![created]);
    Ok(())
}

#[tokio::test]
async fn pages_of_one_workspace_share_their_collection() -> Result<()> {
    test_utils::do_setup();
    let (_store, workspace) = workspace(Role::Admin).await;
    let mut first = workspace.deduction_page();
    let mut second = workspace.deduction_page();
    first.load().await;
    second.load().await;

    first.request_delete(RecordId(1))?;
    first.confirm_delete().await?;

    assert_eq!(second.visible().len(), 1);
    assert!(second.repository().same_as(workspace.deductions()));
    Ok(())
}

#[tokio::test]
async fn payroll_cycles_are_created_pending() -> Result<()> {
    test_utils::do_setup();
    let (_store, workspace) = workspace(Role::Admin).await;
    let mut page = workspace.payroll_cycle_page();
    page.load().await;
    assert_eq!(workspace.overview().active_payroll_cycles, 1);

    page.fill(
        FormValues::new()
            .with("name", "July 2023 Second Half")
            .with("startDate", "2023-07-16")
            .with("endDate", "2023-07-10")
            .with("type", "Biweekly"),
    );
    assert!(matches!(page.submit().await, Err(Error::Validation(_))));
    assert_eq!(page.field_error("endDate"), Some(DATE_ORDER_MESSAGE));

    page.set_field("endDate", "2023-07-31");
    let created = page.submit().await?;
    assert_eq!(created.status, CycleStatus::Pending);
    assert_eq!(created.end_date, date!(2023 - 07 - 31));
    assert_eq!(workspace.overview().active_payroll_cycles, 2);
    Ok(())
}

#[tokio::test]
async fn offline_local_store_reports_load_error() -> Result<()> {
    test_utils::do_setup();
    let (_store, mut workspace) = workspace(Role::Admin).await;
    workspace.payroll_cycle_store_mut().toggle_offline();

    let mut page = workspace.payroll_cycle_page();
    assert_eq!(page.load().await, PageState::LoadError);
    assert!(page.visible().is_empty());
    assert!(page.notification().is_some_and(|n| n.is_error()));
    Ok(())
}

#[tokio::test]
async fn hours_require_a_loaded_employee() -> Result<()> {
    test_utils::do_setup();
    let (store, workspace) = workspace(Role::Staff).await;
    let ana = store.seed(employee_row("Ana", "Lopez", "EMP001"));

    let mut hours = workspace.hours_page();
    hours.load().await;
    let entry = FormValues::new()
        .with("employeeId", ana.to_string())
        .with("date", "2023-07-03")
        .with("normalHours", "8")
        .with("overtimeHours", "1.5");

    // the employee exists remotely but has not been loaded into this session yet
    hours.fill(entry.clone());
    assert!(matches!(hours.submit().await, Err(Error::Validation(_))));
    assert_eq!(hours.field_error("employeeId"), Some(UNKNOWN_EMPLOYEE_MESSAGE));
    assert!(hours.notification().is_none());

    let mut employees = workspace.employee_page();
    employees.load().await;

    hours.fill(entry);
    let created = hours.submit().await?;
    info!(id = %created.id, "hours recorded");
    assert_eq!(created.total_hours(), dec!(9.5));
    assert_eq!(employee_label(workspace.employees(), &created), "Ana Lopez");
    assert_eq!(workspace.overview().total_employees, 1);
    Ok(())
}

#[tokio::test]
async fn navigation_and_dashboard_follow_the_role() -> Result<()> {
    test_utils::do_setup();
    let (_store, staff) = workspace(Role::Staff).await;
    let (_other, admin) = workspace(Role::Admin).await;

    assert!(!staff.shell().is_visible("/payroll-reports"));
    assert!(staff.shell().is_visible("/hours-input"));
    assert!(admin.shell().is_visible("/payroll-reports"));
    assert_eq!(staff.shell().dashboard_cards()[0].title, "Hours Input");
    assert_eq!(admin.shell().dashboard_cards()[0].title, "Employee Management");

    let mut report = admin.payroll_report();
    assert!(report.select_cycle("June 2023"));
    assert_eq!(report.total_net_pay(), dec!(14910));
    assert!(report.generate_payslip(RecordId(1)).is_some());
    Ok(())
}
