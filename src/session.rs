//! Login stub and the session it produces.
//!
//! Credentials are only checked for shape; nothing is verified against a
//! directory. The role is chosen by the caller and fixed for the session.

use std::fmt;
use std::sync::LazyLock;

use crate::form::{FieldRule, FormBinding, FormSchema, FormValues, ValidationErrors, bind};

pub const LOGIN_EMAIL_MESSAGE: &str = "This field is required and must be a valid email";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    email: String,
    role: Role,
}

impl Session {
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

static LOGIN_FORM: LazyLock<FormSchema> = LazyLock::new(|| {
    FormSchema::new(vec![
        FieldRule::new("email").required().email().message(LOGIN_EMAIL_MESSAGE),
        FieldRule::new("password").required(),
    ])
});

impl FormBinding for Credentials {
    fn schema() -> &'static FormSchema {
        &LOGIN_FORM
    }

    fn from_values(values: &FormValues) -> Result<Self, ValidationErrors> {
        Ok(Self {
            email: values.text("email"),
            password: values.text("password"),
        })
    }

    fn to_values(&self) -> FormValues {
        FormValues::new().with("email", &self.email)
    }
}

/// Opens a session for any well-formed credentials.
#[instrument(skip(values))]
pub fn login(values: &FormValues, role: Role) -> Result<Session, ValidationErrors> {
    let credentials: Credentials = bind(values)?;
    info!(email = %credentials.email, "session opened");
    Ok(Session::new(credentials.email, role))
}
