//! Specialized check groups, one module per narrowed state.
//!
//! Each check re-extracts its operand from the subject when it runs. The
//! extraction cannot fail after a passing guard, but a chain narrowed through
//! `instance_of` or a failed-then-ignored `or` group may still carry a
//! mismatched subject, so a mismatch is reported as an ordinary refutation.

mod array;
mod datetime;
mod element;
mod number;
mod object;
mod string;

use std::collections::BTreeMap;

use assume_core::{Element, Value};
use chrono::{DateTime, Utc};

use crate::link::LinkFailure;
use crate::predicates::describe;

fn mismatch(expected: &str, v: &Value) -> LinkFailure {
    LinkFailure::refuted(format!("Expected {expected}, got {}", describe(v)))
}

fn text(v: &Value) -> Result<&str, LinkFailure> {
    v.as_str().ok_or_else(|| mismatch("string", v))
}

fn number(v: &Value) -> Result<f64, LinkFailure> {
    match v {
        Value::Number(n) if !n.is_nan() => Ok(*n),
        other => Err(mismatch("number", other)),
    }
}

fn items(v: &Value) -> Result<&[Value], LinkFailure> {
    v.as_array().ok_or_else(|| mismatch("array", v))
}

fn record(v: &Value) -> Result<&BTreeMap<String, Value>, LinkFailure> {
    v.as_object().ok_or_else(|| mismatch("object", v))
}

fn element(v: &Value) -> Result<&Element, LinkFailure> {
    v.as_element().ok_or_else(|| mismatch("element", v))
}

fn instant(v: &Value) -> Result<&DateTime<Utc>, LinkFailure> {
    v.as_datetime().ok_or_else(|| mismatch("datetime", v))
}

/// `Ok` when `holds`, otherwise a refutation with the lazily built message.
fn ensure(holds: bool, message: impl FnOnce() -> String) -> Result<(), LinkFailure> {
    if holds {
        Ok(())
    } else {
        Err(LinkFailure::refuted(message()))
    }
}
