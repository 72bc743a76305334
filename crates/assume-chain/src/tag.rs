//! # Type-Tag Typestate
//!
//! Each type tag is a distinct marker type. A chain is `Chain<S>` where `S`
//! is one of these markers, and the methods available on the chain are
//! decided by which `impl Chain<...>` blocks apply:
//!
//! ```text
//! Chain<Unknown> ──is_string()──▶ Chain<Str>     string group
//!                ──is_number()──▶ Chain<Num>     number group
//!                ──is_array()───▶ Chain<Arr>     array group
//!                ──is_object()──▶ Chain<Obj>     object group
//!                ──is_element()─▶ Chain<Elem>    element group
//!                ──is_date()────▶ Chain<Date>    datetime group
//!                ──is_boolean()─▶ Chain<Bool>
//!                ──is_null()────▶ Chain<Null>
//!                ──is_undefined()▶ Chain<Undefined>
//!                ──not_nil()────▶ Chain<Present>
//! ```
//!
//! Guard methods exist only on `Chain<Unknown>`, so a chain is narrowed at
//! most once per lineage and never reverts.
//!
//! ```compile_fail
//! use assume_chain::assume;
//!
//! // ERROR: no method named `min_length` found for `Chain<Unknown>`
//! let _ = assume("abc").min_length(2);
//! ```
//!
//! ```compile_fail
//! use assume_chain::assume;
//!
//! // ERROR: no method named `is_number` found for `Chain<Str>`
//! let _ = assume("abc").is_string().is_number();
//! ```

use std::collections::BTreeMap;

use assume_core::{Element, TypeTag, Value};
use chrono::{DateTime, Utc};

// ─── State Types ────────────────────────────────────────────────────

/// Not narrowed yet.
#[derive(Debug, Clone, Copy)]
pub struct Unknown;

/// Narrowed to text.
#[derive(Debug, Clone, Copy)]
pub struct Str;

/// Narrowed to a (non-NaN) number.
#[derive(Debug, Clone, Copy)]
pub struct Num;

/// Narrowed to an array.
#[derive(Debug, Clone, Copy)]
pub struct Arr;

/// Narrowed to a plain object.
#[derive(Debug, Clone, Copy)]
pub struct Obj;

/// Narrowed to an element-like node.
#[derive(Debug, Clone, Copy)]
pub struct Elem;

/// Narrowed to a UTC instant.
#[derive(Debug, Clone, Copy)]
pub struct Date;

/// Narrowed to a boolean.
#[derive(Debug, Clone, Copy)]
pub struct Bool;

/// Narrowed to null.
#[derive(Debug, Clone, Copy)]
pub struct Null;

/// Narrowed to undefined.
#[derive(Debug, Clone, Copy)]
pub struct Undefined;

/// Known not to be nil.
#[derive(Debug, Clone, Copy)]
pub struct Present;

// ─── Sealed Trait ───────────────────────────────────────────────────

mod private {
    pub trait Sealed {}
    impl Sealed for super::Unknown {}
    impl Sealed for super::Str {}
    impl Sealed for super::Num {}
    impl Sealed for super::Arr {}
    impl Sealed for super::Obj {}
    impl Sealed for super::Elem {}
    impl Sealed for super::Date {}
    impl Sealed for super::Bool {}
    impl Sealed for super::Null {}
    impl Sealed for super::Undefined {}
    impl Sealed for super::Present {}
}

/// Marker trait for every chain state.
///
/// Sealed: only the eleven states defined in this module implement it.
pub trait TagState: private::Sealed + std::fmt::Debug + Send + Sync + 'static {
    /// Runtime label recorded in traces and history.
    const TAG: TypeTag;

    /// Rust type handed back by `Chain::commit`.
    type Narrowed;

    /// State after a best-effort refinement to `T` (used by `instance_of`).
    ///
    /// `Unknown` adopts `T`; every narrowed state keeps itself.
    type Refine<T: TagState>: TagState;

    /// Convert the subject into the narrowed type, or give it back.
    fn narrow(value: Value) -> Result<Self::Narrowed, Value>;
}

impl TagState for Unknown {
    const TAG: TypeTag = TypeTag::Unknown;
    type Narrowed = Value;
    type Refine<T: TagState> = T;

    fn narrow(value: Value) -> Result<Value, Value> {
        Ok(value)
    }
}

macro_rules! narrowed_state {
    ($marker:ty, $tag:ident, $narrowed:ty, |$v:ident| $body:expr) => {
        impl TagState for $marker {
            const TAG: TypeTag = TypeTag::$tag;
            type Narrowed = $narrowed;
            type Refine<T: TagState> = Self;

            fn narrow($v: Value) -> Result<$narrowed, Value> {
                $body
            }
        }
    };
}

narrowed_state!(Str, String, String, |v| match v {
    Value::String(s) => Ok(s),
    other => Err(other),
});
narrowed_state!(Num, Number, f64, |v| match v {
    Value::Number(n) if !n.is_nan() => Ok(n),
    other => Err(other),
});
narrowed_state!(Arr, Array, Vec<Value>, |v| match v {
    Value::Array(items) => Ok(items),
    other => Err(other),
});
narrowed_state!(Obj, Object, BTreeMap<String, Value>, |v| match v {
    Value::Object(map) => Ok(map),
    other => Err(other),
});
narrowed_state!(Elem, Element, Element, |v| match v {
    Value::Element(el) => Ok(el),
    other => Err(other),
});
narrowed_state!(Date, DateTime, DateTime<Utc>, |v| match v {
    Value::DateTime(dt) => Ok(dt),
    other => Err(other),
});
narrowed_state!(Bool, Boolean, bool, |v| match v {
    Value::Bool(b) => Ok(b),
    other => Err(other),
});
narrowed_state!(Null, Null, (), |v| match v {
    Value::Null => Ok(()),
    other => Err(other),
});
narrowed_state!(Undefined, Undefined, (), |v| match v {
    Value::Undefined => Ok(()),
    other => Err(other),
});
narrowed_state!(Present, Present, Value, |v| Ok(v));

// ─── Classes for `instance_of` ──────────────────────────────────────

/// A Rust carrier type usable with `Chain::instance_of`.
///
/// `Tag` is the best-effort refinement: arrays, elements and plain records
/// refine the chain, every other class leaves it `Unknown`.
pub trait Class: 'static {
    /// Name used in failure messages.
    const NAME: &'static str;
    /// Refinement applied to an unknown chain.
    type Tag: TagState;
    /// Whether `value` is an instance of this class.
    fn is_instance(value: &Value) -> bool;
}

impl Class for Vec<Value> {
    const NAME: &'static str = "Array";
    type Tag = Arr;
    fn is_instance(value: &Value) -> bool {
        matches!(value, Value::Array(_))
    }
}

impl Class for BTreeMap<String, Value> {
    const NAME: &'static str = "Object";
    type Tag = Obj;
    fn is_instance(value: &Value) -> bool {
        matches!(value, Value::Object(_))
    }
}

impl Class for Element {
    const NAME: &'static str = "Element";
    type Tag = Elem;
    fn is_instance(value: &Value) -> bool {
        matches!(value, Value::Element(_))
    }
}

impl Class for String {
    const NAME: &'static str = "String";
    type Tag = Unknown;
    fn is_instance(value: &Value) -> bool {
        matches!(value, Value::String(_))
    }
}

impl Class for f64 {
    const NAME: &'static str = "Number";
    type Tag = Unknown;
    fn is_instance(value: &Value) -> bool {
        matches!(value, Value::Number(_))
    }
}

impl Class for bool {
    const NAME: &'static str = "Boolean";
    type Tag = Unknown;
    fn is_instance(value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }
}

impl Class for DateTime<Utc> {
    const NAME: &'static str = "Date";
    type Tag = Unknown;
    fn is_instance(value: &Value) -> bool {
        matches!(value, Value::DateTime(_))
    }
}
