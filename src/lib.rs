//! # hondupay
//!
//! The headless core of the HonduPay payroll administration front-end:
//! employee persistence against a hosted PostgREST store, one shared
//! repository per entity type, declarative form binding and the list + form
//! state machine that drives every page.
//!
//! ```ignore
//! use hondupay::{Client, Role, Session, Workspace};
//!
//! let session = Session::new("admin@hondupay.hn", Role::Admin);
//! let workspace = Workspace::new(Client::from_env()?, session);
//! let mut employees = workspace.employee_page();
//! employees.load().await;
//!
//! employees.set_field("name", "Ana");
//! // ...the other fields...
//! match employees.submit().await {
//!     Ok(employee) => println!("created {}", employee.id),
//!     Err(hondupay::Error::Validation(errors)) => {
//!         for e in errors.iter() {
//!             eprintln!("{e}");
//!         }
//!     }
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Sentry Integration
//!
//! Transport and persistence errors capture a span trace when they are
//! created inside an instrumented span. Install
//! [`tracing_error::ErrorLayer`](https://docs.rs/tracing-error) to record them:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())
//!     .init();
//! ```
//!
//! With the `sentry` feature enabled, [`Error`] converts into a
//! `sentry_core::Breadcrumb`.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod form;
pub mod gateway;
pub mod navigation;
pub mod page;
pub mod payroll;
pub mod repository;
pub mod session;
pub mod utils;
pub mod workspace;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::{Client, EmployeesApi};
pub use config::StoreConfig;
pub use endpoints::StoreEndpoint;
pub use error::{Error, Result, StoreError};
pub use form::{FieldError, FieldRule, FormBinding, FormSchema, FormValues, ValidationErrors};
pub use gateway::{Gateway, LocalStore};
pub use page::{EntityPage, FormMode, Notification, NotificationKind, PageState};
pub use repository::{Entity, RecordId, Repository, SharedRepository};
pub use session::{Role, Session};
pub use workspace::{DeductionPage, EmployeePage, HoursPage, PayrollCyclePage, Workspace};

// Re-export the payroll entities for convenience
pub use payroll::deduction::{Deduction, DeductionDraft, DeductionFrequency};
pub use payroll::employee::{Employee, EmployeeDraft, PaymentMethod, SalaryType};
pub use payroll::hours_entry::{HoursEntry, HoursEntryDraft, HoursLedger};
pub use payroll::payroll_cycle::{CycleStatus, CycleType, PayrollCycle, PayrollCycleDraft};
pub use payroll::report::{PayrollReport, PayrollReportRow, Payslip};

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;
