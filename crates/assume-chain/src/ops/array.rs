//! Checks available on `Chain<Arr>`.

use assume_core::{preview, Value};

use super::{ensure, items};
use crate::chain::Chain;
use crate::tag::Arr;

impl Chain<Arr> {
    pub fn not_empty(self) -> Self {
        self.queue("not_empty", |v| {
            ensure(!items(v)?.is_empty(), || "Expected non-empty array".into())
        })
    }

    pub fn length(self, exact: usize) -> Self {
        self.queue("length", move |v| {
            let len = items(v)?.len();
            ensure(len == exact, || {
                format!("Expected array of length {exact}, got {len}")
            })
        })
    }

    pub fn min_length(self, min: usize) -> Self {
        self.queue("min_length", move |v| {
            let len = items(v)?.len();
            ensure(len >= min, || {
                format!("Expected array of at least {min} items, got {len}")
            })
        })
    }

    pub fn max_length(self, max: usize) -> Self {
        self.queue("max_length", move |v| {
            let len = items(v)?.len();
            ensure(len <= max, || {
                format!("Expected array of at most {max} items, got {len}")
            })
        })
    }

    pub fn includes(self, needle: impl Into<Value>) -> Self {
        let needle = needle.into();
        let limits = *self.context().preview_limits();
        self.queue("includes", move |v| {
            ensure(items(v)?.contains(&needle), || {
                format!("Expected array to include {}", preview(&needle, &limits))
            })
        })
    }

    /// Every item satisfies `predicate`. Vacuously true for an empty array.
    pub fn every<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.queue("every", move |v| {
            let failing = items(v)?.iter().position(|item| !predicate(item));
            ensure(failing.is_none(), || {
                format!(
                    "Expected every item to match, item {} did not",
                    failing.unwrap_or_default()
                )
            })
        })
    }

    pub fn some<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.queue("some", move |v| {
            ensure(items(v)?.iter().any(&predicate), || {
                "Expected at least one item to match".into()
            })
        })
    }

    /// No two items are equal.
    pub fn unique(self) -> Self {
        self.queue("unique", |v| {
            let items = items(v)?;
            let duplicate = items
                .iter()
                .enumerate()
                .find_map(|(i, a)| items[i + 1..].iter().position(|b| a == b).map(|_| i));
            ensure(duplicate.is_none(), || {
                format!(
                    "Expected unique items, item {} is repeated",
                    duplicate.unwrap_or_default()
                )
            })
        })
    }
}
