//! Type guards. Defined only on `Chain<Unknown>`; each one queues a type
//! check and moves the chain to the matching narrowed state.

use assume_core::Value;

use crate::chain::Chain;
use crate::link::LinkFailure;
use crate::predicates::{self, describe};
use crate::tag::{Arr, Bool, Date, Elem, Null, Num, Obj, Present, Str, TagState, Undefined, Unknown};

impl Chain<Unknown> {
    pub fn is_string(self) -> Chain<Str> {
        self.guard("is_string", predicates::is_string, "string")
    }

    /// Passes for every number except `NaN`.
    pub fn is_number(self) -> Chain<Num> {
        self.guard("is_number", predicates::is_number, "number")
    }

    pub fn is_array(self) -> Chain<Arr> {
        self.guard("is_array", predicates::is_array, "array")
    }

    /// Plain key/value record.
    pub fn is_object(self) -> Chain<Obj> {
        self.guard("is_object", predicates::is_plain_object, "object")
    }

    pub fn is_element(self) -> Chain<Elem> {
        self.guard("is_element", predicates::is_element, "element")
    }

    pub fn is_date(self) -> Chain<Date> {
        self.guard("is_date", predicates::is_date, "datetime")
    }

    pub fn is_boolean(self) -> Chain<Bool> {
        self.guard("is_boolean", predicates::is_boolean, "boolean")
    }

    pub fn is_null(self) -> Chain<Null> {
        self.guard("is_null", predicates::is_null, "null")
    }

    pub fn is_undefined(self) -> Chain<Undefined> {
        self.guard("is_undefined", predicates::is_undefined, "undefined")
    }

    /// Neither null nor undefined.
    pub fn not_nil(self) -> Chain<Present> {
        self.guard("not_nil", predicates::is_present, "a present value")
    }

    /// Anything but null. Undefined passes.
    pub fn not_null(self) -> Chain<Present> {
        self.guard("not_null", |v| !predicates::is_null(v), "a non-null value")
    }

    /// Same check as [`Chain::not_nil`], under its long name.
    pub fn not_null_or_undefined(self) -> Chain<Present> {
        self.guard(
            "not_null_or_undefined",
            predicates::is_present,
            "a present value",
        )
    }

    fn guard<T: TagState>(
        self,
        method: &'static str,
        test: fn(&Value) -> bool,
        expected: &'static str,
    ) -> Chain<T> {
        self.queue_as::<T, _>(method, move |v| {
            if test(v) {
                Ok(())
            } else {
                Err(LinkFailure::refuted(format!(
                    "Expected {expected}, got {}",
                    describe(v)
                )))
            }
        })
    }
}
