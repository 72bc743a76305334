//! Checks available on `Chain<Str>`.

use regex::Regex;

use super::{ensure, text};
use crate::chain::Chain;
use crate::link::LinkFailure;
use crate::predicates;
use crate::tag::Str;

impl Chain<Str> {
    pub fn not_empty(self) -> Self {
        self.queue("not_empty", |v| {
            ensure(!text(v)?.is_empty(), || "Expected non-empty string".into())
        })
    }

    /// At least `min` characters (Unicode scalar values, not bytes).
    pub fn min_length(self, min: usize) -> Self {
        self.queue("min_length", move |v| {
            let len = text(v)?.chars().count();
            ensure(len >= min, || {
                format!("Expected string of at least {min} characters, got {len}")
            })
        })
    }

    pub fn max_length(self, max: usize) -> Self {
        self.queue("max_length", move |v| {
            let len = text(v)?.chars().count();
            ensure(len <= max, || {
                format!("Expected string of at most {max} characters, got {len}")
            })
        })
    }

    pub fn length(self, exact: usize) -> Self {
        self.queue("length", move |v| {
            let len = text(v)?.chars().count();
            ensure(len == exact, || {
                format!("Expected string of exactly {exact} characters, got {len}")
            })
        })
    }

    pub fn contains(self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.queue("contains", move |v| {
            ensure(text(v)?.contains(needle.as_str()), || {
                format!("Expected string to contain {needle:?}")
            })
        })
    }

    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.queue("starts_with", move |v| {
            ensure(text(v)?.starts_with(prefix.as_str()), || {
                format!("Expected string to start with {prefix:?}")
            })
        })
    }

    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.queue("ends_with", move |v| {
            ensure(text(v)?.ends_with(suffix.as_str()), || {
                format!("Expected string to end with {suffix:?}")
            })
        })
    }

    /// Regular-expression match (unanchored, like `Regex::is_match`).
    ///
    /// The pattern is compiled once, here. An invalid pattern does not
    /// panic; the queued check fails with the compile error as its cause.
    pub fn matches(self, pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => self.matches_regex(re),
            Err(e) => {
                let pattern = pattern.to_string();
                let reason = e.to_string();
                self.queue("matches", move |_| {
                    Err(LinkFailure::from_error(
                        format!("Invalid pattern {pattern:?}"),
                        anyhow::anyhow!(reason.clone()),
                    ))
                })
            }
        }
    }

    /// Match against a pre-compiled expression.
    pub fn matches_regex(self, re: Regex) -> Self {
        self.queue("matches", move |v| {
            ensure(re.is_match(text(v)?), || {
                format!("Expected string to match /{}/", re.as_str())
            })
        })
    }

    pub fn is_email(self) -> Self {
        self.queue("is_email", |v| {
            ensure(predicates::is_email(text(v)?), || {
                "Expected a valid e-mail address".into()
            })
        })
    }

    /// No leading or trailing whitespace.
    pub fn is_trimmed(self) -> Self {
        self.queue("is_trimmed", |v| {
            let s = text(v)?;
            ensure(s.trim() == s, || {
                "Expected string without surrounding whitespace".into()
            })
        })
    }

    pub fn one_of<I, T>(self, options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.queue("one_of", move |v| {
            let s = text(v)?;
            ensure(options.iter().any(|o| o == s), || {
                format!("Expected one of {options:?}")
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use assume_core::{AssumeConfig, Context, Value};

    use crate::chain::Chain;
    use crate::tag::Str;

    fn s(v: &str) -> Chain<Str> {
        Chain::with_context(Context::new(AssumeConfig::default()), v).is_string()
    }

    #[test]
    fn lengths_count_characters() {
        assert!(s("héllo").length(5).try_run());
        assert!(s("héllo").min_length(5).max_length(5).try_run());
        let err = s("ab").min_length(3).run().unwrap_err();
        assert_eq!(
            err.original_message(),
            "Expected string of at least 3 characters, got 2"
        );
        assert!(!s("abcd").max_length(3).try_run());
    }

    #[test]
    fn emptiness_and_trimming() {
        assert!(!s("").not_empty().try_run());
        assert!(s(" a").not_empty().try_run());
        assert!(s("a b").is_trimmed().try_run());
        assert!(!s(" a").is_trimmed().try_run());
        assert!(!s("a\n").is_trimmed().try_run());
    }

    #[test]
    fn substring_checks() {
        let c = s("assume-chain").contains("-").starts_with("assume").ends_with("chain");
        assert!(c.try_run());
        let err = s("abc").contains("z").run().unwrap_err();
        assert_eq!(err.original_message(), "Expected string to contain \"z\"");
    }

    #[test]
    fn regex_matching() {
        assert!(s("order-1234").matches(r"^order-\d+$").try_run());
        let err = s("order-x").matches(r"^order-\d+$").run().unwrap_err();
        assert_eq!(err.original_message(), r"Expected string to match /^order-\d+$/");
    }

    #[test]
    fn invalid_pattern_fails_without_panicking() {
        let err = s("abc").matches("(unclosed").run().unwrap_err();
        assert!(err.original_message().starts_with("Invalid pattern"));
        assert!(err.cause().is_some());
    }

    #[test]
    fn email_and_membership() {
        assert!(s("dev@example.com").is_email().try_run());
        assert!(!s("dev@example").is_email().try_run());
        assert!(s("red").one_of(["red", "green"]).try_run());
        assert!(!s("blue").one_of(vec!["red".to_string()]).try_run());
    }

    #[test]
    fn mismatched_subject_is_a_refutation() {
        let c = Chain::with_context(Context::new(AssumeConfig::default()), Value::from(1))
            .is_string()
            .or(true)
            .not_empty();
        let err = c.run().unwrap_err();
        assert_eq!(err.original_message(), "Expected string, got number");
    }
}
