//! Sentry integration for hondupay errors.
//!
//! Only available with the `sentry` feature:
//!
//! ```toml
//! [dependencies]
//! hondupay = { version = "0.1", features = ["sentry"] }
//! ```

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;

fn store_data(error: &Error) -> BTreeMap<String, Value> {
    let mut data = BTreeMap::new();
    if let Some(url) = error.url() {
        data.insert("url".to_string(), Value::from(url.to_string()));
    }
    if let Some(status) = error.status_code() {
        data.insert("status_code".to_string(), Value::from(status.as_u16()));
    }
    if let Some(code) = error.store_error().and_then(|s| s.code.clone()) {
        data.insert("store_code".to_string(), Value::from(code));
    }
    data
}

impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let (category, level) = match error {
            Error::Request { .. } => ("http.request", sentry_core::Level::Error),
            Error::DeserializationError { .. } => ("http.response", sentry_core::Level::Error),
            Error::Persistence { .. } => ("store", sentry_core::Level::Error),
            Error::DependencyConflict { .. } => ("store", sentry_core::Level::Warning),
            Error::InvalidEndpoint | Error::Config { .. } => {
                ("hondupay.config", sentry_core::Level::Error)
            }
            Error::Validation(_) => ("hondupay.validation", sentry_core::Level::Info),
            Error::PageBusy { .. } | Error::NoPendingDelete => {
                ("hondupay.page", sentry_core::Level::Info)
            }
        };

        let mut data = store_data(error);
        if let Error::DependencyConflict { entity, id, .. } = error {
            data.insert("entity".to_string(), Value::from(*entity));
            data.insert("id".to_string(), Value::from(id.0));
        }

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(error.to_string()),
            data,
            level,
            ..Default::default()
        }
    }
}

/// Extra context for a Sentry scope: span trace, URL, status and store code.
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context: BTreeMap<String, Value> = store_data(error)
        .into_iter()
        .map(|(k, v)| (format!("hondupay.{k}"), v))
        .collect();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "hondupay.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    if let Some(body) = error.response_body() {
        let truncated: String = body.chars().take(500).collect();
        context.insert("hondupay.response_body".to_string(), Value::from(truncated));
    }

    context
}
