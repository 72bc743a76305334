//! Leaf predicates over [`Value`].
//!
//! Pure functions with no diagnostics of their own. Guards and specialized
//! checks are built from them; callers can also pass them to
//! [`Chain::that`](crate::Chain::that) directly.

use assume_core::Value;

pub fn is_string(v: &Value) -> bool {
    matches!(v, Value::String(_))
}

/// Numbers other than `NaN`.
pub fn is_number(v: &Value) -> bool {
    matches!(v, Value::Number(n) if !n.is_nan())
}

pub fn is_array(v: &Value) -> bool {
    matches!(v, Value::Array(_))
}

/// Plain key/value records. Arrays, dates and elements are not objects.
pub fn is_plain_object(v: &Value) -> bool {
    matches!(v, Value::Object(_))
}

pub fn is_element(v: &Value) -> bool {
    matches!(v, Value::Element(_))
}

pub fn is_date(v: &Value) -> bool {
    matches!(v, Value::DateTime(_))
}

pub fn is_boolean(v: &Value) -> bool {
    matches!(v, Value::Bool(_))
}

pub fn is_null(v: &Value) -> bool {
    matches!(v, Value::Null)
}

pub fn is_undefined(v: &Value) -> bool {
    matches!(v, Value::Undefined)
}

/// Null or undefined.
pub fn is_nil(v: &Value) -> bool {
    v.is_nil()
}

pub fn is_present(v: &Value) -> bool {
    !v.is_nil()
}

/// Shape check for e-mail addresses: one `@`, a non-empty local part, and a
/// dotted domain with no empty labels. No whitespace anywhere.
pub fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Short description of a value's runtime type for failure messages.
///
/// Same as [`Value::kind`] except that `NaN` is called out.
pub fn describe(v: &Value) -> String {
    match v {
        Value::Number(n) if n.is_nan() => "NaN".to_string(),
        other => other.kind().to_string(),
    }
}
