//! Lists the employees of a project, optionally filtered.
//!
//! ```sh
//! SUPABASE_URL=https://<project>.supabase.co SUPABASE_ANON_KEY=<key> \
//!     cargo run --example employee_console -- lopez
//! ```

use hondupay::navigation::NavigationShell;
use hondupay::{Client, PageState, Role, Session, Workspace};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let client = Client::from_env()?;
    let workspace = Workspace::new(client, Session::new("console@hondupay.hn", Role::Admin));

    let mut page = workspace.employee_page();
    if page.load().await == PageState::LoadError {
        if let Some(notification) = page.notification() {
            eprintln!("{}", notification.message);
        }
        return Ok(());
    }

    if let Some(term) = std::env::args().nth(1) {
        page.set_search(term);
    }

    println!("{}", NavigationShell::title_for("/employees"));
    for employee in page.visible() {
        println!(
            "{:>5}  {:<10} {:<30} {:<28} {}",
            employee.id.0,
            employee.code,
            employee.full_name(),
            employee.work_email,
            employee.payment_method.label(),
        );
    }

    workspace.payroll_cycle_page().load().await;
    let overview = workspace.overview();
    println!(
        "{} employee(s), {} active payroll cycle(s)",
        overview.total_employees, overview.active_payroll_cycles
    );
    Ok(())
}
