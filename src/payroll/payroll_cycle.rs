use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::form::{
    FORMAT_MESSAGE, FieldRule, FormBinding, FormSchema, FormValues, ValidationErrors,
};
use crate::repository::{Entity, RecordId};
use crate::utils::date_format::{format_iso_date, iso_date_format, parse_iso_date};

pub const DATE_ORDER_MESSAGE: &str = "End date must not be before the start date";

static ISO_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleType {
    Monthly,
    Biweekly,
}

impl CycleType {
    pub const ACCEPTED: &'static [&'static str] = &["Monthly", "Biweekly"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Biweekly => "Biweekly",
        }
    }
}

impl FromStr for CycleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monthly" => Ok(Self::Monthly),
            "Biweekly" => Ok(Self::Biweekly),
            other => Err(format!("Unknown cycle type: {other}")),
        }
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleStatus {
    Approved,
    #[default]
    Pending,
}

impl CycleStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Pending => "Pending",
        }
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pay period. The status is not part of the form: new cycles start
/// [`CycleStatus::Pending`] and edits keep the status they had.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCycle {
    pub id: RecordId,
    pub name: String,
    #[serde(with = "iso_date_format")]
    pub start_date: Date,
    #[serde(with = "iso_date_format")]
    pub end_date: Date,
    #[serde(rename = "type")]
    pub cycle_type: CycleType,
    pub status: CycleStatus,
}

impl PayrollCycle {
    /// Cycles the payroll cycles page starts with.
    #[must_use]
    pub fn samples() -> Vec<Self> {
        vec![
            Self {
                id: RecordId(1),
                name: "June 2023".to_string(),
                start_date: time::macros::date!(2023 - 06 - 01),
                end_date: time::macros::date!(2023 - 06 - 30),
                cycle_type: CycleType::Monthly,
                status: CycleStatus::Approved,
            },
            Self {
                id: RecordId(2),
                name: "July 2023 First Half".to_string(),
                start_date: time::macros::date!(2023 - 07 - 01),
                end_date: time::macros::date!(2023 - 07 - 15),
                cycle_type: CycleType::Biweekly,
                status: CycleStatus::Pending,
            },
        ]
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == CycleStatus::Pending
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCycleDraft {
    pub name: String,
    #[serde(with = "iso_date_format")]
    pub start_date: Date,
    #[serde(with = "iso_date_format")]
    pub end_date: Date,
    #[serde(rename = "type")]
    pub cycle_type: CycleType,
}

impl Entity for PayrollCycle {
    type Draft = PayrollCycleDraft;

    const KIND: &'static str = "payroll cycle";
    const LABEL: &'static str = "Payroll Cycle";

    fn id(&self) -> RecordId {
        self.id
    }

    fn draft(&self) -> PayrollCycleDraft {
        PayrollCycleDraft {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            cycle_type: self.cycle_type,
        }
    }

    fn from_draft(id: RecordId, draft: PayrollCycleDraft, previous: Option<&Self>) -> Self {
        Self {
            id,
            name: draft.name,
            start_date: draft.start_date,
            end_date: draft.end_date,
            cycle_type: draft.cycle_type,
            status: previous.map_or(CycleStatus::Pending, |p| p.status),
        }
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.cycle_type, self.status)
    }
}

static PAYROLL_CYCLE_FORM: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new(vec![
        FieldRule::new("name").required(),
        FieldRule::new("startDate").required().pattern(&ISO_DATE_PATTERN),
        FieldRule::new("endDate").required().pattern(&ISO_DATE_PATTERN),
        FieldRule::new("type").required().one_of(CycleType::ACCEPTED),
    ])
});

fn date_field(values: &FormValues, field: &'static str) -> Result<Date, ValidationErrors> {
    parse_iso_date(&values.text(field)).map_err(|_| ValidationErrors::single(field, FORMAT_MESSAGE))
}

impl FormBinding for PayrollCycleDraft {
    fn schema() -> &'static FormSchema {
        &PAYROLL_CYCLE_FORM
    }

    fn from_values(values: &FormValues) -> Result<Self, ValidationErrors> {
        let start_date = date_field(values, "startDate")?;
        let end_date = date_field(values, "endDate")?;
        if end_date < start_date {
            return Err(ValidationErrors::single("endDate", DATE_ORDER_MESSAGE));
        }

        Ok(Self {
            name: values.text("name"),
            start_date,
            end_date,
            cycle_type: values.parsed("type")?,
        })
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("startDate", format_iso_date(self.start_date))
            .with("endDate", format_iso_date(self.end_date))
            .with("type", self.cycle_type.as_str())
    }
}
