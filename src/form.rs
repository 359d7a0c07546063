//! Declarative form binding.
//!
//! Every entity form is described by a [`FormSchema`]: one [`FieldRule`] per
//! input control, carrying the `required`, `min`/`max`, `integer`, `step`,
//! `pattern` and `one_of` constraints for that control. A single generic pass,
//! [`FormSchema::check`], evaluates the rules against the raw [`FormValues`]
//! and reports at most one message per failing field. Only when every field
//! passes is the typed draft built through [`FormBinding::from_values`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const NUMBER_MESSAGE: &str = "Please enter a valid number";
pub const FORMAT_MESSAGE: &str = "Please enter a value in the expected format";
pub const OPTION_MESSAGE: &str = "Please select one of the available options";
pub const EMAIL_MESSAGE: &str = "Must be a valid email";

/// No whitespace on either side of a single `@`.
pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("email pattern is valid"));

/// Raw input control values keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for pre-filling a form.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// The trimmed value of a field, `None` when absent or blank.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The trimmed value of a field, or an empty string.
    #[must_use]
    pub fn text(&self, field: &str) -> String {
        self.get(field).unwrap_or_default().to_string()
    }

    /// Parses a field, reporting a field-scoped error when it does not parse.
    pub fn parsed<T: FromStr>(&self, field: &'static str) -> Result<T, ValidationErrors> {
        self.get(field)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ValidationErrors::single(field, FORMAT_MESSAGE))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A single failing field and the message shown next to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field-scoped validation failures collected before submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error, Diagnostic)]
#[error("{} field(s) failed validation", .errors.len())]
#[diagnostic(
    code(hondupay::validation),
    help("Correct the highlighted fields and submit the form again")
)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// The message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Constraints for one input control.
#[derive(Clone, Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub integer: bool,
    pub step: Option<Decimal>,
    pub pattern: Option<Regex>,
    pub one_of: Option<&'static [&'static str]>,
    /// Overrides every default message for this field.
    pub message: Option<&'static str>,
}

impl FieldRule {
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            min: None,
            max: None,
            integer: false,
            step: None,
            pattern: None,
            one_of: None,
            message: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn min(mut self, min: impl Into<Decimal>) -> Self {
        self.min = Some(min.into());
        self
    }

    #[must_use]
    pub fn max(mut self, max: impl Into<Decimal>) -> Self {
        self.max = Some(max.into());
        self
    }

    #[must_use]
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    #[must_use]
    pub fn step(mut self, step: Decimal) -> Self {
        self.step = Some(step);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: &Regex) -> Self {
        self.pattern = Some(pattern.clone());
        self
    }

    #[must_use]
    pub fn email(self) -> Self {
        self.pattern(&EMAIL_PATTERN).message(EMAIL_MESSAGE)
    }

    #[must_use]
    pub fn one_of(mut self, options: &'static [&'static str]) -> Self {
        self.one_of = Some(options);
        self
    }

    #[must_use]
    pub fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    fn is_numeric(&self) -> bool {
        self.integer || self.min.is_some() || self.max.is_some() || self.step.is_some()
    }

    /// Evaluates the rule, returning the message to show when it fails.
    #[must_use]
    pub fn evaluate(&self, values: &FormValues) -> Option<&'static str> {
        let fail = |default: &'static str| Some(self.message.unwrap_or(default));

        let Some(value) = values.get(self.field) else {
            return if self.required { fail(REQUIRED_MESSAGE) } else { None };
        };

        if self.is_numeric() {
            let Ok(number) = Decimal::from_str(value) else {
                return fail(NUMBER_MESSAGE);
            };
            let out_of_range = self.min.is_some_and(|min| number < min)
                || self.max.is_some_and(|max| number > max);
            let off_step = self
                .step
                .is_some_and(|step| !step.is_zero() && !(number % step).is_zero());
            if (self.integer && !number.fract().is_zero()) || out_of_range || off_step {
                return fail(NUMBER_MESSAGE);
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return fail(FORMAT_MESSAGE);
            }
        }

        if let Some(options) = self.one_of {
            if !options.contains(&value) {
                return fail(OPTION_MESSAGE);
            }
        }

        None
    }
}

/// The rules of one form, evaluated together.
#[derive(Clone, Debug)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    #[must_use]
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.field)
    }

    /// Runs every rule; fails with one message per failing field.
    pub fn check(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for rule in &self.rules {
            if let Some(message) = rule.evaluate(values) {
                errors.push(rule.field, message);
            }
        }
        errors.into_result()
    }
}

/// A draft that can be produced from, and written back to, a form.
pub trait FormBinding: Sized {
    fn schema() -> &'static FormSchema;

    /// Builds the draft. Only called once the schema has passed.
    fn from_values(values: &FormValues) -> Result<Self, ValidationErrors>;

    /// Values used to pre-fill the form, e.g. when editing.
    fn to_values(&self) -> FormValues;
}

/// Validates the values against the draft's schema and builds the draft.
pub fn bind<D: FormBinding>(values: &FormValues) -> Result<D, ValidationErrors> {
    D::schema().check(values)?;
    D::from_values(values)
}
