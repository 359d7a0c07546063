//! Work-hour entries.
//!
//! Entries reference employees by identifier. The reference is checked once,
//! when an entry is created or edited, by [`HoursLedger`]; deleting an
//! employee later does not touch the entries that name them.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::{Error, Result};
use crate::form::{FORMAT_MESSAGE, FieldRule, FormBinding, FormSchema, FormValues, ValidationErrors};
use crate::gateway::{Gateway, LocalStore};
use crate::payroll::employee::Employee;
use crate::repository::{Entity, RecordId, SharedRepository};
use crate::utils::date_format::{format_iso_date, iso_date_format, parse_iso_date};

pub const MAX_DAILY_HOURS: u8 = 24;
pub const HOURS_MESSAGE: &str = "Please enter a valid number of hours";
pub const UNKNOWN_EMPLOYEE_MESSAGE: &str = "Select an existing employee";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursEntry {
    pub id: RecordId,
    pub employee_id: RecordId,
    #[serde(with = "iso_date_format")]
    pub date: Date,
    pub normal_hours: Decimal,
    pub overtime_hours: Decimal,
}

impl HoursEntry {
    #[must_use]
    pub fn total_hours(&self) -> Decimal {
        self.normal_hours + self.overtime_hours
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursEntryDraft {
    pub employee_id: RecordId,
    #[serde(with = "iso_date_format")]
    pub date: Date,
    pub normal_hours: Decimal,
    pub overtime_hours: Decimal,
}

impl Entity for HoursEntry {
    type Draft = HoursEntryDraft;

    const KIND: &'static str = "hours entry";
    const LABEL: &'static str = "Hours Entry";

    fn id(&self) -> RecordId {
        self.id
    }

    fn draft(&self) -> HoursEntryDraft {
        HoursEntryDraft {
            employee_id: self.employee_id,
            date: self.date,
            normal_hours: self.normal_hours,
            overtime_hours: self.overtime_hours,
        }
    }

    fn from_draft(id: RecordId, draft: HoursEntryDraft, _previous: Option<&Self>) -> Self {
        Self {
            id,
            employee_id: draft.employee_id,
            date: draft.date,
            normal_hours: draft.normal_hours,
            overtime_hours: draft.overtime_hours,
        }
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.employee_id, format_iso_date(self.date))
    }
}

fn hours_rule(field: &'static str) -> FieldRule {
    FieldRule::new(field)
        .required()
        .min(0)
        .max(MAX_DAILY_HOURS)
        .step(Decimal::new(5, 1))
        .message(HOURS_MESSAGE)
}

static HOURS_FORM: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new(vec![
        FieldRule::new("employeeId").required().integer(),
        FieldRule::new("date").required(),
        hours_rule("normalHours"),
        hours_rule("overtimeHours"),
    ])
});

impl FormBinding for HoursEntryDraft {
    fn schema() -> &'static FormSchema {
        &HOURS_FORM
    }

    fn from_values(values: &FormValues) -> std::result::Result<Self, ValidationErrors> {
        let date = parse_iso_date(&values.text("date"))
            .map_err(|_| ValidationErrors::single("date", FORMAT_MESSAGE))?;

        Ok(Self {
            employee_id: RecordId(values.parsed("employeeId")?),
            date,
            normal_hours: values.parsed("normalHours")?,
            overtime_hours: values.parsed("overtimeHours")?,
        })
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("employeeId", self.employee_id.to_string())
            .with("date", format_iso_date(self.date))
            .with("normalHours", self.normal_hours.to_string())
            .with("overtimeHours", self.overtime_hours.to_string())
    }
}

/// Local gateway for hour entries that refuses entries for unknown employees.
#[derive(Debug)]
pub struct HoursLedger {
    employees: SharedRepository<Employee>,
    store: LocalStore<HoursEntry>,
}

impl HoursLedger {
    #[must_use]
    pub fn new(employees: SharedRepository<Employee>) -> Self {
        Self::with_store(employees, LocalStore::new())
    }

    #[must_use]
    pub fn with_store(
        employees: SharedRepository<Employee>,
        store: LocalStore<HoursEntry>,
    ) -> Self {
        Self { employees, store }
    }

    pub fn store_mut(&mut self) -> &mut LocalStore<HoursEntry> {
        &mut self.store
    }

    fn check_employee(&self, draft: &HoursEntryDraft) -> Result<()> {
        if self.employees.read(|r| r.contains(draft.employee_id)) {
            return Ok(());
        }
        debug!(employee_id = %draft.employee_id, "hours submitted for an unknown employee");
        Err(Error::Validation(ValidationErrors::single(
            "employeeId",
            UNKNOWN_EMPLOYEE_MESSAGE,
        )))
    }
}

impl Gateway<HoursEntry> for HoursLedger {
    async fn create(&self, draft: &HoursEntryDraft) -> Result<HoursEntry> {
        self.check_employee(draft)?;
        self.store.create(draft).await
    }

    async fn list(&self) -> Result<Vec<HoursEntry>> {
        self.store.list().await
    }

    async fn update(&self, id: RecordId, draft: &HoursEntryDraft) -> Result<HoursEntry> {
        self.check_employee(draft)?;
        self.store.update(id, draft).await
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        self.store.delete(id).await
    }
}

/// Name shown for the employee an entry belongs to.
#[must_use]
pub fn employee_label(employees: &SharedRepository<Employee>, entry: &HoursEntry) -> String {
    employees
        .get(entry.employee_id)
        .map_or_else(|| format!("Employee #{}", entry.employee_id), |e| e.full_name())
}
