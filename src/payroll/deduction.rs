use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::form::{FieldRule, FormBinding, FormSchema, FormValues, ValidationErrors};
use crate::repository::{Entity, RecordId};

pub const AMOUNT_MESSAGE: &str = "Please enter a valid amount";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeductionFrequency {
    Monthly,
    Biweekly,
}

impl DeductionFrequency {
    pub const ACCEPTED: &'static [&'static str] = &["Monthly", "Biweekly"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Biweekly => "Biweekly",
        }
    }
}

impl FromStr for DeductionFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monthly" => Ok(Self::Monthly),
            "Biweekly" => Ok(Self::Biweekly),
            other => Err(format!("Unknown frequency: {other}")),
        }
    }
}

impl fmt::Display for DeductionFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring payroll deduction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deduction {
    pub id: RecordId,
    pub name: String,
    pub amount: Decimal,
    pub frequency: DeductionFrequency,
}

impl Deduction {
    /// Rows the deductions page starts with.
    #[must_use]
    pub fn samples() -> Vec<Self> {
        vec![
            Self {
                id: RecordId(1),
                name: "Income Tax".to_string(),
                amount: Decimal::from(500),
                frequency: DeductionFrequency::Monthly,
            },
            Self {
                id: RecordId(2),
                name: "Health Insurance".to_string(),
                amount: Decimal::from(100),
                frequency: DeductionFrequency::Biweekly,
            },
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionDraft {
    pub name: String,
    pub amount: Decimal,
    pub frequency: DeductionFrequency,
}

impl Entity for Deduction {
    type Draft = DeductionDraft;

    const KIND: &'static str = "deduction";
    const LABEL: &'static str = "Deduction";

    fn id(&self) -> RecordId {
        self.id
    }

    fn draft(&self) -> DeductionDraft {
        DeductionDraft {
            name: self.name.clone(),
            amount: self.amount,
            frequency: self.frequency,
        }
    }

    fn from_draft(id: RecordId, draft: DeductionDraft, _previous: Option<&Self>) -> Self {
        Self {
            id,
            name: draft.name,
            amount: draft.amount,
            frequency: draft.frequency,
        }
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.frequency)
    }
}

static DEDUCTION_FORM: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new(vec![
        FieldRule::new("name").required(),
        FieldRule::new("amount").required().min(0).message(AMOUNT_MESSAGE),
        FieldRule::new("frequency")
            .required()
            .one_of(DeductionFrequency::ACCEPTED),
    ])
});

impl FormBinding for DeductionDraft {
    fn schema() -> &'static FormSchema {
        &DEDUCTION_FORM
    }

    fn from_values(values: &FormValues) -> Result<Self, ValidationErrors> {
        Ok(Self {
            name: values.text("name"),
            amount: values.parsed("amount")?,
            frequency: values.parsed("frequency")?,
        })
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", &self.name)
            .with("amount", self.amount.to_string())
            .with("frequency", self.frequency.as_str())
    }
}
