use miette::Diagnostic;
use serde_json::json;

use hondupay::error::{FOREIGN_KEY_VIOLATION, StoreError};
use hondupay::{Error, RecordId, ValidationErrors};

#[test]
fn test_postgrest_error_body_deserializes() {
    let body = json!({
        "code": "23503",
        "details": "Key (id)=(7) is still referenced from table \"hours\".",
        "hint": null,
        "message": "update or delete on table \"employees\" violates foreign key constraint \"hours_employee_id_fkey\" on table \"hours\""
    });

    let store: StoreError = serde_json::from_value(body).unwrap();
    assert!(store.is_foreign_key_violation());
    assert!(store.details.as_deref().is_some_and(|d| d.contains("(7)")));
    assert_eq!(store.hint, None);
}

#[test]
fn test_error_body_without_code_deserializes() {
    let store: StoreError = serde_json::from_value(json!({ "message": "JWT expired" })).unwrap();
    assert_eq!(store.code, None);
    assert!(!store.is_foreign_key_violation());
    assert_eq!(store.to_string(), "JWT expired");
}

#[test]
fn test_diagnostic_codes() {
    let cases: Vec<(Error, &str)> = vec![
        (
            Error::persistence(StoreError::new("boom"), None, None),
            "hondupay::persistence",
        ),
        (
            Error::DependencyConflict {
                entity: "employee",
                id: RecordId(1),
                store: StoreError::new("fk").with_code(FOREIGN_KEY_VIOLATION),
            },
            "hondupay::dependency_conflict",
        ),
        (Error::NoPendingDelete, "hondupay::no_pending_delete"),
        (Error::PageBusy { state: "loading" }, "hondupay::page_busy"),
        (
            Error::Validation(ValidationErrors::single("age", "Age must be between 18 and 100")),
            "hondupay::validation",
        ),
    ];

    for (error, expected) in cases {
        let code = error.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some(expected), "code for {error}");
    }
}

#[test]
fn test_validation_errors_wrap_transparently() {
    let mut errors = ValidationErrors::default();
    errors.push("name", "This field is required");
    errors.push("workEmail", "Must be a valid email");
    let error = Error::from(errors);

    assert_eq!(error.to_string(), "2 field(s) failed validation");
    match &error {
        Error::Validation(inner) => {
            let fields: Vec<&str> = inner.iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["name", "workEmail"]);
        }
        other => panic!("Expected a validation error, got {other:?}"),
    }
    assert!(error.store_error().is_none());
    assert!(error.span_trace().is_none());
}

#[test]
fn test_deserialization_error_keeps_the_body() {
    let source = serde_json::from_str::<Vec<u8>>("{\"rows\":").unwrap_err();
    let error = Error::DeserializationError {
        source,
        body: Some("{\"rows\":".to_string()),
    };
    assert_eq!(error.response_body(), Some("{\"rows\":"));
    assert!(error.to_string().starts_with("error decoding response"));
    assert!(error.is_persistence());
}

#[test]
fn test_persistence_classification() {
    assert!(Error::persistence(StoreError::new("boom"), None, None).is_persistence());

    let conflict = Error::DependencyConflict {
        entity: "employee",
        id: RecordId(1),
        store: StoreError::new("fk").with_code(FOREIGN_KEY_VIOLATION),
    };
    assert!(!conflict.is_persistence());
    assert!(conflict.is_dependency_conflict());

    let invalid = Error::Validation(ValidationErrors::single(
        "age",
        "Age must be between 18 and 100",
    ));
    assert!(!invalid.is_persistence());
    assert!(!Error::NoPendingDelete.is_persistence());
}
