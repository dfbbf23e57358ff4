//! Request body shape validation.
//!
//! Fields that feed identity lookups must be plain strings. A structured value
//! such as `{"$gt": ""}` in an `email` field would otherwise turn an equality
//! lookup into an operator query in the document store.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("field '{0}' must be a string")]
    Structured(String),

    #[error("field '{0}' is required")]
    Missing(String),

    #[error("field '{0}' uses a reserved operator key")]
    OperatorKey(String),

    #[error("field '{0}' is not a valid identifier")]
    InvalidId(String),

    #[error("field '{0}' is not accepted here")]
    UnknownField(String),
}

impl InputError {
    /// Name of the offending field, for logs.
    pub fn field(&self) -> Option<&str> {
        match self {
            InputError::NotAnObject => None,
            InputError::Structured(f)
            | InputError::Missing(f)
            | InputError::OperatorKey(f)
            | InputError::InvalidId(f)
            | InputError::UnknownField(f) => Some(f),
        }
    }
}

/// The shape a single body field arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(String),
    Structured(Value),
    Missing,
}

impl FieldValue {
    /// Classify a JSON value. Only strings count as scalars; numbers, booleans,
    /// arrays and objects are all rejected where a string is expected.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::String(s)) => FieldValue::Scalar(s.clone()),
            Some(other) => FieldValue::Structured(other.clone()),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldValue::Scalar(_))
    }
}

/// Accept a field only if it is a non-empty plain string.
pub fn reject_injection_operators(field: &str, value: FieldValue) -> Result<String, InputError> {
    match value {
        FieldValue::Scalar(s) if !s.trim().is_empty() => Ok(s),
        FieldValue::Scalar(_) | FieldValue::Missing => Err(InputError::Missing(field.to_string())),
        FieldValue::Structured(_) => Err(InputError::Structured(field.to_string())),
    }
}

/// A JSON object body whose fields are read through shape checks.
#[derive(Debug, Clone)]
pub struct ShapedBody {
    fields: Map<String, Value>,
}

impl ShapedBody {
    /// Accept only objects whose keys (at any depth) are free of `$`-prefixed
    /// operators and dotted paths.
    pub fn parse(body: Value) -> Result<Self, InputError> {
        let Value::Object(fields) = body else {
            return Err(InputError::NotAnObject);
        };
        for (key, value) in &fields {
            if is_operator_key(key) || contains_operator_keys(value) {
                return Err(InputError::OperatorKey(key.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn field(&self, name: &str) -> FieldValue {
        FieldValue::from_json(self.fields.get(name))
    }

    /// Required non-empty string field.
    pub fn scalar(&self, name: &str) -> Result<String, InputError> {
        reject_injection_operators(name, self.field(name))
    }

    /// Optional string field: absent/null is `None`, anything non-string is rejected.
    pub fn optional_scalar(&self, name: &str) -> Result<Option<String>, InputError> {
        match self.field(name) {
            FieldValue::Missing => Ok(None),
            FieldValue::Scalar(s) => Ok(Some(s)),
            FieldValue::Structured(_) => Err(InputError::Structured(name.to_string())),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

fn is_operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

fn contains_operator_keys(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(k, v)| is_operator_key(k) || contains_operator_keys(v)),
        Value::Array(items) => items.iter().any(contains_operator_keys),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn classifies_field_shapes() {
        assert_eq!(
            FieldValue::from_json(Some(&json!("a@b.c"))),
            FieldValue::Scalar("a@b.c".to_string())
        );
        assert_eq!(FieldValue::from_json(None), FieldValue::Missing);
        assert_eq!(FieldValue::from_json(Some(&Value::Null)), FieldValue::Missing);
        assert!(matches!(
            FieldValue::from_json(Some(&json!({ "$gt": "" }))),
            FieldValue::Structured(_)
        ));
        assert!(matches!(
            FieldValue::from_json(Some(&json!(42))),
            FieldValue::Structured(_)
        ));
    }

    #[test]
    fn operator_object_in_email_is_rejected() {
        let err = reject_injection_operators(
            "email",
            FieldValue::from_json(Some(&json!({ "$gt": "" }))),
        )
        .unwrap_err();
        assert_eq!(err, InputError::Structured("email".to_string()));
    }

    #[test]
    fn blank_scalars_count_as_missing() {
        assert_eq!(
            reject_injection_operators("email", FieldValue::Scalar("   ".to_string())),
            Err(InputError::Missing("email".to_string()))
        );
    }

    #[test]
    fn body_must_be_an_object() {
        assert_eq!(ShapedBody::parse(json!(["a"])).unwrap_err(), InputError::NotAnObject);
        assert_eq!(ShapedBody::parse(json!("a")).unwrap_err(), InputError::NotAnObject);
    }

    #[test]
    fn nested_operator_keys_are_rejected() {
        let err = ShapedBody::parse(json!({
            "name": "Chef",
            "address": { "city": { "$ne": null } }
        }))
        .unwrap_err();
        assert_eq!(err, InputError::OperatorKey("address".to_string()));

        let err = ShapedBody::parse(json!({ "tags": [{ "$where": "1" }] })).unwrap_err();
        assert_eq!(err.field(), Some("tags"));

        let err = ShapedBody::parse(json!({ "role.admin": true })).unwrap_err();
        assert_eq!(err.field(), Some("role.admin"));
    }

    #[test]
    fn optional_scalars() {
        let body = ShapedBody::parse(json!({ "bio": "hello", "phone": null, "rate": 40 })).unwrap();
        assert_eq!(body.optional_scalar("bio"), Ok(Some("hello".to_string())));
        assert_eq!(body.optional_scalar("phone"), Ok(None));
        assert_eq!(body.optional_scalar("missing"), Ok(None));
        assert_eq!(
            body.optional_scalar("rate"),
            Err(InputError::Structured("rate".to_string()))
        );
    }

    proptest! {
        #[test]
        fn structured_values_never_pass(
            op in "\\$[a-z]{1,8}",
            operand in "[a-z0-9]{0,8}",
        ) {
            let mut inner = Map::new();
            inner.insert(op, Value::String(operand));
            let value = Value::Object(inner);
            let res = reject_injection_operators("email", FieldValue::from_json(Some(&value)));
            prop_assert_eq!(res, Err(InputError::Structured("email".to_string())));
        }

        #[test]
        fn plain_strings_pass_unchanged(s in "[a-zA-Z0-9@._+-]{1,40}") {
            let res = reject_injection_operators("email", FieldValue::Scalar(s.clone()));
            prop_assert_eq!(res, Ok(s));
        }
    }
}
