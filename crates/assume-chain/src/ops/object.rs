//! Checks available on `Chain<Obj>`.

use assume_core::Value;

use super::{ensure, record};
use crate::chain::Chain;
use crate::link::LinkFailure;
use crate::tag::Obj;

impl Chain<Obj> {
    pub fn has_key(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.queue("has_key", move |v| {
            ensure(record(v)?.contains_key(&key), || {
                format!("Expected object to have key {key:?}")
            })
        })
    }

    /// Every key in `keys` is present. Reports the first missing one.
    pub fn has_keys<I, K>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.queue("has_keys", move |v| {
            let map = record(v)?;
            let missing = keys.iter().find(|k| !map.contains_key(*k));
            ensure(missing.is_none(), || {
                format!(
                    "Expected object to have key {:?}",
                    missing.map(String::as_str).unwrap_or_default()
                )
            })
        })
    }

    pub fn not_empty(self) -> Self {
        self.queue("not_empty", |v| {
            ensure(!record(v)?.is_empty(), || "Expected non-empty object".into())
        })
    }

    pub fn key_count(self, exact: usize) -> Self {
        self.queue("key_count", move |v| {
            let count = record(v)?.len();
            ensure(count == exact, || {
                format!("Expected object with {exact} keys, got {count}")
            })
        })
    }

    /// `predicate` holds for the value under `key`. A missing key fails.
    pub fn field<F>(self, key: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let key = key.into();
        self.queue("field", move |v| {
            let map = record(v)?;
            let Some(field) = map.get(&key) else {
                return Err(LinkFailure::refuted(format!(
                    "Expected object to have key {key:?}"
                )));
            };
            ensure(predicate(field), || {
                format!("Expected field {key:?} to match, got {}", field.kind())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use assume_core::{AssumeConfig, Context, Value};

    use crate::chain::Chain;
    use crate::tag::Obj;

    fn o(v: Value) -> Chain<Obj> {
        Chain::with_context(Context::new(AssumeConfig::default()), v).is_object()
    }

    fn user() -> Value {
        Value::object([
            ("name", Value::from("ada")),
            ("age", Value::from(36)),
        ])
    }

    #[test]
    fn key_presence() {
        assert!(o(user()).has_key("name").has_keys(["name", "age"]).try_run());
        let err = o(user()).has_keys(["name", "email"]).run().unwrap_err();
        assert_eq!(err.original_message(), "Expected object to have key \"email\"");
    }

    #[test]
    fn counts() {
        assert!(o(user()).not_empty().key_count(2).try_run());
        assert!(!o(Value::object(Vec::<(String, Value)>::new())).not_empty().try_run());
        assert!(!o(user()).key_count(3).try_run());
    }

    #[test]
    fn field_predicates() {
        assert!(o(user())
            .field("age", |v| v.as_f64().is_some_and(|n| n >= 18.0))
            .try_run());
        let err = o(user())
            .field("name", |v| v.as_f64().is_some())
            .run()
            .unwrap_err();
        assert_eq!(err.original_message(), "Expected field \"name\" to match, got string");
        assert!(!o(user()).field("missing", |_| true).try_run());
    }
}
