//! Field-violation types and the bridge from derived `validator` rules.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Run a type's derived `validator` rules and flatten the outcome into
/// field violations.
///
/// Nested struct rules are reported as `outer.inner` fields. Rules
/// without an explicit message fall back to the rule code.
pub fn schema_violations<T: Validate>(value: &T) -> Vec<FieldViolation> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => flatten(&errors, ""),
    }
}

fn flatten(errors: &ValidationErrors, prefix: &str) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(violations) => {
                for violation in violations {
                    let message = violation
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| violation.code.to_string());
                    out.push(FieldViolation::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                out.extend(flatten(nested, &path));
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    out.extend(flatten(nested, &format!("{path}[{index}]")));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Inner {
        #[validate(length(min = 1, message = "must not be empty"))]
        label: String,
    }

    #[derive(Debug, Validate)]
    struct Outer {
        #[validate(length(min = 1, max = 8, message = "must be between 1 and 8 characters"))]
        name: String,
        #[validate(nested)]
        inner: Inner,
    }

    #[test]
    fn valid_value_has_no_violations() {
        let value = Outer {
            name: "invoice".into(),
            inner: Inner { label: "a".into() },
        };
        assert!(schema_violations(&value).is_empty());
    }

    #[test]
    fn empty_field_is_reported_with_message() {
        let value = Outer {
            name: String::new(),
            inner: Inner { label: "a".into() },
        };
        let violations = schema_violations(&value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].message, "must be between 1 and 8 characters");
    }

    #[test]
    fn nested_field_is_reported_with_dotted_path() {
        let value = Outer {
            name: "invoice".into(),
            inner: Inner {
                label: String::new(),
            },
        };
        let violations = schema_violations(&value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "inner.label");
    }
}
