//! Employee records and their persistence gateway.
//!
//! The `employees` table names its columns in snake_case (`last_name`,
//! `personal_email`, ...) while the rest of the crate works with
//! [`Employee`] and [`EmployeeDraft`], which serialize in camelCase for the
//! UI. [`EmployeeColumns`] and [`EmployeeRow`] are the only types that know
//! the column names, and they never leave this module.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::endpoints::StoreEndpoint;
use crate::error::{Error, Result, StoreError};
use crate::form::{FieldRule, FormBinding, FormSchema, FormValues, ValidationErrors};
use crate::repository::{Entity, RecordId};

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 100;
pub const AGE_MESSAGE: &str = "Age must be between 18 and 100";

/// How an employee is paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Banco", alias = "Bank")]
    Bank,
    #[serde(rename = "Transferencia Internacional", alias = "International Transfer")]
    InternationalTransfer,
    #[serde(rename = "Plataforma Internacional", alias = "International Platform")]
    InternationalPlatform,
}

impl PaymentMethod {
    pub const ALL: [Self; 3] = [
        Self::Bank,
        Self::InternationalTransfer,
        Self::InternationalPlatform,
    ];

    /// Values accepted from the payment method select.
    pub const ACCEPTED: &'static [&'static str] = &[
        "Banco",
        "Transferencia Internacional",
        "Plataforma Internacional",
        "Bank",
        "International Transfer",
        "International Platform",
    ];

    /// Value written to the `payment_method` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "Banco",
            Self::InternationalTransfer => "Transferencia Internacional",
            Self::InternationalPlatform => "Plataforma Internacional",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::InternationalTransfer => "International Transfer",
            Self::InternationalPlatform => "International Platform",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s || m.label() == s)
            .ok_or_else(|| format!("Unknown payment method: {s}"))
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an employee is paid a monthly salary or by the hour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryType {
    #[serde(rename = "Mensual", alias = "Monthly")]
    Monthly,
    #[serde(rename = "Por Hora", alias = "Hourly")]
    Hourly,
}

impl SalaryType {
    pub const ALL: [Self; 2] = [Self::Monthly, Self::Hourly];

    /// Values accepted from the salary type select.
    pub const ACCEPTED: &'static [&'static str] = &["Mensual", "Por Hora", "Monthly", "Hourly"];

    /// Value written to the `salary_type` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Mensual",
            Self::Hourly => "Por Hora",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Hourly => "Hourly",
        }
    }
}

impl FromStr for SalaryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.label() == s)
            .ok_or_else(|| format!("Unknown salary type: {s}"))
    }
}

impl fmt::Display for SalaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An employee as held by the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: RecordId,
    pub name: String,
    pub last_name: String,
    pub code: String,
    pub age: u8,
    pub address: String,
    pub personal_email: String,
    pub work_email: String,
    pub payment_method: PaymentMethod,
    pub salary_type: SalaryType,
}

impl Employee {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Every persisted employee field, without the identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub last_name: String,
    pub code: String,
    pub age: u8,
    pub address: String,
    pub personal_email: String,
    pub work_email: String,
    pub payment_method: PaymentMethod,
    pub salary_type: SalaryType,
}

impl Entity for Employee {
    type Draft = EmployeeDraft;

    const KIND: &'static str = "employee";
    const LABEL: &'static str = "Employee";

    fn id(&self) -> RecordId {
        self.id
    }

    fn draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            code: self.code.clone(),
            age: self.age,
            address: self.address.clone(),
            personal_email: self.personal_email.clone(),
            work_email: self.work_email.clone(),
            payment_method: self.payment_method,
            salary_type: self.salary_type,
        }
    }

    fn from_draft(id: RecordId, draft: EmployeeDraft, _previous: Option<&Self>) -> Self {
        Self {
            id,
            name: draft.name,
            last_name: draft.last_name,
            code: draft.code,
            age: draft.age,
            address: draft.address,
            personal_email: draft.personal_email,
            work_email: draft.work_email,
            payment_method: draft.payment_method,
            salary_type: draft.salary_type,
        }
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.last_name, self.code)
    }
}

static EMPLOYEE_FORM: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new(vec![
        FieldRule::new("name").required(),
        FieldRule::new("lastName").required(),
        FieldRule::new("code").required(),
        FieldRule::new("age")
            .required()
            .integer()
            .min(MIN_AGE)
            .max(MAX_AGE)
            .message(AGE_MESSAGE),
        FieldRule::new("address").required(),
        FieldRule::new("personalEmail").required().email(),
        FieldRule::new("workEmail").required().email(),
        FieldRule::new("paymentMethod")
            .required()
            .one_of(PaymentMethod::ACCEPTED),
        FieldRule::new("salaryType")
            .required()
            .one_of(SalaryType::ACCEPTED),
    ])
});

impl FormBinding for EmployeeDraft {
    fn schema() -> &'static FormSchema {
        &EMPLOYEE_FORM
    }

    fn from_values(values: &FormValues) -> std::result::Result<Self, ValidationErrors> {
        Ok(Self {
            name: values.text("name"),
            last_name: values.text("lastName"),
            code: values.text("code"),
            age: values.parsed("age")?,
            address: values.text("address"),
            personal_email: values.text("personalEmail"),
            work_email: values.text("workEmail"),
            payment_method: values.parsed("paymentMethod")?,
            salary_type: values.parsed("salaryType")?,
        })
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("lastName", &self.last_name)
            .with("code", &self.code)
            .with("age", self.age.to_string())
            .with("address", &self.address)
            .with("personalEmail", &self.personal_email)
            .with("workEmail", &self.work_email)
            .with("paymentMethod", self.payment_method.as_str())
            .with("salaryType", self.salary_type.as_str())
    }
}

/// Column values sent on insert and update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
struct EmployeeColumns<'a> {
    name: &'a str,
    last_name: &'a str,
    code: &'a str,
    age: u8,
    address: &'a str,
    personal_email: &'a str,
    work_email: &'a str,
    payment_method: PaymentMethod,
    salary_type: SalaryType,
}

impl<'a> From<&'a EmployeeDraft> for EmployeeColumns<'a> {
    fn from(draft: &'a EmployeeDraft) -> Self {
        Self {
            name: &draft.name,
            last_name: &draft.last_name,
            code: &draft.code,
            age: draft.age,
            address: &draft.address,
            personal_email: &draft.personal_email,
            work_email: &draft.work_email,
            payment_method: draft.payment_method,
            salary_type: draft.salary_type,
        }
    }
}

/// A row as returned by the store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct EmployeeRow {
    id: RecordId,
    name: String,
    last_name: String,
    code: String,
    age: u8,
    address: String,
    personal_email: String,
    work_email: String,
    payment_method: PaymentMethod,
    salary_type: SalaryType,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            last_name: row.last_name,
            code: row.code,
            age: row.age,
            address: row.address,
            personal_email: row.personal_email,
            work_email: row.work_email,
            payment_method: row.payment_method,
            salary_type: row.salary_type,
        }
    }
}

fn single_row(
    rows: Vec<EmployeeRow>,
    id: Option<RecordId>,
    endpoint: &StoreEndpoint,
) -> Result<Employee> {
    rows.into_iter().next().map(Employee::from).ok_or_else(|| {
        let store = match id {
            Some(id) => StoreError::no_matching_row(Employee::KIND, id),
            None => StoreError::new("the store did not return the inserted row"),
        };
        Error::persistence(store, Some(endpoint.to_string()), None)
    })
}

/// Insert one employee and return the stored row.
#[instrument(skip(client, draft), fields(code = %draft.code))]
pub async fn create(client: &Client, draft: &EmployeeDraft) -> Result<Employee> {
    let endpoint = StoreEndpoint::table(&client.config().employees_table);
    let rows: Vec<EmployeeRow> = client
        .post(&endpoint, &[EmployeeColumns::from(draft)])
        .await?;
    let employee = single_row(rows, None, &endpoint)?;
    debug!(id = %employee.id, "employee created");
    Ok(employee)
}

/// Retrieve every employee, in store order.
///
/// Rows whose columns do not decode (an unknown payment method, a missing
/// age) are logged and left out, so one bad row never hides the others.
#[instrument(skip(client))]
pub async fn list(client: &Client) -> Result<Vec<Employee>> {
    let endpoint = StoreEndpoint::table(&client.config().employees_table);
    let rows: Vec<serde_json::Value> = client.get(&endpoint).await?;
    let total = rows.len();
    let employees: Vec<Employee> = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned();
            match serde_json::from_value::<EmployeeRow>(row) {
                Ok(row) => Some(Employee::from(row)),
                Err(e) => {
                    warn!(?id, error = %e, "skipping employee row that does not decode");
                    None
                }
            }
        })
        .collect();
    if employees.len() < total {
        warn!(skipped = total - employees.len(), "some employee rows were skipped");
    }
    Ok(employees)
}

/// Replace every field of the employee with `id`.
#[instrument(skip(client, draft))]
pub async fn update(client: &Client, id: RecordId, draft: &EmployeeDraft) -> Result<Employee> {
    let endpoint = StoreEndpoint::row(&client.config().employees_table, id);
    let rows: Vec<EmployeeRow> = client
        .patch(&endpoint, &EmployeeColumns::from(draft))
        .await?;
    single_row(rows, Some(id), &endpoint)
}

/// Delete the employee with `id`.
///
/// A foreign-key violation reported by the store becomes
/// [`Error::DependencyConflict`]; every other failure is passed through.
#[instrument(skip(client))]
pub async fn delete(client: &Client, id: RecordId) -> Result<()> {
    let endpoint = StoreEndpoint::row(&client.config().employees_table, id);
    match client.delete::<Vec<EmployeeRow>>(&endpoint).await {
        Ok(rows) => single_row(rows, Some(id), &endpoint).map(|_| ()),
        Err(Error::Persistence { store, .. }) if store.is_foreign_key_violation() => {
            warn!(%id, message = %store.message, "employee still has associated records");
            Err(Error::DependencyConflict {
                entity: Employee::KIND,
                id,
                store,
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::form::{EMAIL_MESSAGE, bind};

    fn ana_values() -> FormValues {
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

    #[test]
    fn binds_a_complete_form() {
        let draft: EmployeeDraft = bind(&ana_values()).unwrap();
        assert_eq!(draft.last_name, "Lopez");
        assert_eq!(draft.age, 40);
        assert_eq!(draft.payment_method, PaymentMethod::Bank);
        assert_eq!(draft.salary_type, SalaryType::Monthly);
        assert_eq!(draft.to_values(), ana_values());
    }

    #[test]
    fn english_option_labels_are_accepted() {
        let values = ana_values()
            .with("paymentMethod", "International Platform")
            .with("salaryType", "Hourly");
        let draft: EmployeeDraft = bind(&values).unwrap();
        assert_eq!(draft.payment_method, PaymentMethod::InternationalPlatform);
        assert_eq!(draft.salary_type, SalaryType::Hourly);
    }

    #[test]
    fn every_failing_field_gets_its_own_message() {
        let values = ana_values()
            .with("age", "17")
            .with("workEmail", "a work.com")
            .with("code", "");
        let errors = bind::<EmployeeDraft>(&values).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("age"), Some(AGE_MESSAGE));
        assert_eq!(errors.get("workEmail"), Some(EMAIL_MESSAGE));
        assert!(errors.get("code").is_some());
    }

    #[test]
    fn columns_use_the_store_naming() {
        let draft: EmployeeDraft = bind(&ana_values()).unwrap();
        let columns = serde_json::to_value(EmployeeColumns::from(&draft)).unwrap();
        assert_eq!(
            columns,
            json!({
                "name": "Ana",
                "last_name": "Lopez",
                "code": "EMP010",
                "age": 40,
                "address": "X",
                "personal_email": "a@b.com",
                "work_email": "a@work.com",
                "payment_method": "Banco",
                "salary_type": "Mensual",
            })
        );
    }

    #[test]
    fn rows_translate_to_the_internal_model() {
        let row: EmployeeRow = serde_json::from_value(json!({
            "id": 12,
            "name": "Ana",
            "last_name": "Lopez",
            "code": "EMP010",
            "age": 40,
            "address": "X",
            "personal_email": "a@b.com",
            "work_email": "a@work.com",
            "payment_method": "Transferencia Internacional",
            "salary_type": "Por Hora",
            "created_at": "2024-03-01T10:00:00+00:00",
        }))
        .unwrap();
        let employee = Employee::from(row);

        assert_eq!(employee.id, RecordId(12));
        assert_eq!(employee.payment_method, PaymentMethod::InternationalTransfer);
        let internal = serde_json::to_value(&employee).unwrap();
        assert_eq!(internal["lastName"], "Lopez");
        assert_eq!(internal["workEmail"], "a@work.com");
        assert!(internal.get("last_name").is_none());
    }

    #[test]
    fn search_text_joins_name_surname_and_code() {
        let draft: EmployeeDraft = bind(&ana_values()).unwrap();
        let employee = Employee::from_draft(RecordId(1), draft, None);
        assert_eq!(employee.search_text(), "Ana Lopez EMP010");
        assert_eq!(employee.full_name(), "Ana Lopez");
    }
}
