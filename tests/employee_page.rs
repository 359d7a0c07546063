#[macro_use]
extern crate tracing;


use std::time::Duration;

use hondupay::form::EMAIL_MESSAGE;
use hondupay::page::BUSY_LABEL;
use hondupay::payroll::employee::AGE_MESSAGE;
use hondupay::{
    Error, FormValues, NotificationKind, PageState, RecordId, Role, Session, Workspace,
};
use miette::Result;
use rstest::rstest;

use test_utils::{MockStore, employee_row};

fn workspace(store: &MockStore) -> Workspace {
    Workspace::new(store.client(), Session::new("admin@hondupay.hn", Role::Admin))
}

fn ana_lopez() -> FormValues {
    FormValues::new()
        .with("name", "Ana")
        .with("lastName", "Lopez")
        .with("code", "EMP010")
        .with("age", "40")
        .with("address", "X")
        .with("personalEmail", "a@b.com")
        .with("workEmail", "a@work.com")
        .with("paymentMethod", "Banco")
        .with("salaryType", "Mensual")
}

#[tokio::test]
async fn ana_lopez_is_created_then_deleted() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    let workspace = workspace(&store);
    let mut page = workspace.employee_page();

    assert_eq!(page.load().await, PageState::Ready);
    assert!(page.visible().is_empty());
    assert_eq!(page.submit_label(), "Add Employee");

    page.fill(ana_lopez());
    let created = page.submit().await?;
    info!(id = %created.id, "created Ana Lopez");

    let visible = page.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, created.id);
    assert_eq!(visible[0].full_name(), "Ana Lopez");
    assert_eq!(visible[0].work_email, "a@work.com");
    assert!(page.form().is_empty());
    assert_eq!(
        page.notification().map(|n| n.kind),
        Some(NotificationKind::Success)
    );

    page.dismiss_notification();
    page.request_delete(created.id)?;
    assert_eq!(store.rows().len(), 1);
    page.confirm_delete().await?;

    assert!(page.visible().is_empty());
    assert!(store.rows().is_empty());
    let notification = page.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, "Employee deleted successfully");
    assert_eq!(page.state(), PageState::Ready);
    Ok(())
}

#[rstest]
#[case("17", false)]
#[case("18", true)]
#[case("100", true)]
#[case("101", false)]
#[tokio::test]
async fn age_bounds_are_checked_before_the_gateway(
    #[case] age: &str,
    #[case] accepted: bool,
) -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    page.load().await;
    let requests_after_load = store.request_count();

    page.fill(ana_lopez().with("age", age));
    let outcome = page.submit().await;

    if accepted {
        assert!(outcome.is_ok());
        assert_eq!(store.request_count(), requests_after_load + 1);
    } else {
        assert!(matches!(outcome, Err(Error::Validation(_))));
        assert_eq!(page.field_error("age"), Some(AGE_MESSAGE));
        assert_eq!(store.request_count(), requests_after_load);
        assert!(page.notification().is_none());
        assert_eq!(page.form().get("age"), Some(age));
    }
    Ok(())
}

#[tokio::test]
async fn malformed_emails_never_reach_the_store() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    page.load().await;

    page.fill(ana_lopez().with("personalEmail", "a b@c.com").with("workEmail", "a@b@c"));
    assert!(page.submit().await.is_err());
    assert_eq!(page.field_errors().len(), 2);
    assert_eq!(page.field_error("personalEmail"), Some(EMAIL_MESSAGE));
    assert_eq!(page.field_error("workEmail"), Some(EMAIL_MESSAGE));
    assert!(store.rows().is_empty());

    page.set_field("personalEmail", "a@b.com");
    page.set_field("workEmail", "a@work.com");
    page.submit().await?;
    assert!(page.field_errors().is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_hydration_leaves_a_usable_empty_page() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    store.seed(employee_row("Ana", "Lopez", "EMP001"));
    store.set_failing(true);

    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    assert_eq!(page.load().await, PageState::LoadError);
    assert!(page.visible().is_empty());
    assert!(page.can_submit());
    assert!(page.notification().is_some_and(|n| n.is_error()));

    store.set_failing(false);
    assert_eq!(page.load().await, PageState::Ready);
    assert_eq!(page.visible().len(), 1);
    Ok(())
}

#[tokio::test]
async fn store_rejection_returns_to_ready_with_a_notification() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    store.enforce_unique_codes();
    store.seed(employee_row("Ana", "Lopez", "EMP010"));

    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    page.load().await;

    page.fill(ana_lopez());
    assert!(page.submit().await.is_err());
    assert_eq!(page.state(), PageState::Ready);
    assert_ne!(page.submit_label(), BUSY_LABEL);
    assert_eq!(page.visible().len(), 1);
    let notification = page.notification().unwrap();
    assert!(notification.is_error());
    assert!(notification.message.contains("employees_code_key"));
    // the form keeps its values so the user can correct them
    assert_eq!(page.form().get("code"), Some("EMP010"));
    Ok(())
}

#[tokio::test]
async fn editing_updates_the_row_in_place() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    let ana = store.seed(employee_row("Ana", "Lopez", "EMP001"));
    store.seed(employee_row("Luis", "Zelaya", "EMP002"));

    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    page.load().await;

    assert!(page.begin_edit(RecordId(ana)));
    assert_eq!(page.form().get("lastName"), Some("Lopez"));
    assert_eq!(page.form().get("paymentMethod"), Some("Banco"));
    assert_eq!(page.submit_label(), "Update Employee");

    page.set_field("address", "Colonia Kennedy");
    let updated = page.submit().await?;
    assert_eq!(updated.id, RecordId(ana));
    assert_eq!(updated.address, "Colonia Kennedy");

    let codes: Vec<String> = page.visible().into_iter().map(|e| e.code).collect();
    assert_eq!(codes, vec!["EMP001", "EMP002"]);
    assert_eq!(store.rows()[0]["address"], "Colonia Kennedy");
    assert_eq!(page.submit_label(), "Add Employee");
    Ok(())
}

#[tokio::test]
async fn dependency_conflict_keeps_the_row_and_reports_it() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    let id = store.seed(employee_row("Ana", "Lopez", "EMP001"));
    store.mark_dependent(id);

    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    page.load().await;

    page.request_delete(RecordId(id))?;
    let err = page.confirm_delete().await.unwrap_err();
    assert!(err.is_dependency_conflict());
    assert_eq!(page.state(), PageState::Ready);
    assert_eq!(page.visible().len(), 1);
    assert_eq!(
        page.notification().map(|n| n.message.as_str()),
        Some("cannot delete: employee has associated records")
    );
    assert_eq!(page.pending_delete(), None);
    Ok(())
}

#[tokio::test]
async fn search_filters_without_calling_the_store() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    store.seed(employee_row("Ana", "Lopez", "EMP001"));
    store.seed(employee_row("Luis", "Zelaya", "EMP002"));
    store.seed(employee_row("Ana Maria", "Flores", "EMP003"));

    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    page.load().await;
    let requests = store.request_count();

    page.set_search("ana");
    assert_eq!(page.visible().len(), 2);
    page.set_search("emp002");
    assert_eq!(page.visible()[0].name, "Luis");
    page.set_search("ana lopez");
    assert_eq!(page.visible().len(), 1);
    page.set_search("");
    assert_eq!(page.visible().len(), 3);

    assert_eq!(store.request_count(), requests);
    Ok(())
}

#[tokio::test]
async fn abandoned_submit_leaves_the_page_ready() -> Result<()> {
    test_utils::do_setup();
    let store = MockStore::spawn().await;
    let workspace = workspace(&store);
    let mut page = workspace.employee_page();
    page.load().await;

    page.fill(ana_lopez());
    let _ = tokio::time::timeout(Duration::from_nanos(1), page.submit()).await;
    assert_eq!(page.state(), PageState::Ready);
    assert_ne!(page.submit_label(), BUSY_LABEL);

    page.fill(ana_lopez());
    let created = page.submit().await?;
    assert!(page.visible().iter().any(|e| e.id == created.id));
    assert_eq!(page.state(), PageState::Ready);
    Ok(())
}
