use serde::{Deserialize, Serialize};

/// Failure text used when an item returns `false` and no message is set.
pub const DEFAULT_REFUTED_MESSAGE: &str = "Assumption refuted";

/// Aggregate options.
///
/// A bare string converts into options carrying only a message, so
/// `assuming(items, "config must be complete")` reads naturally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumeOptions {
    /// Terminal methods return `Ok` even when the aggregate failed.
    pub quiet: bool,
    /// Replaces the default failure text for items that returned `false`.
    pub message: Option<String>,
    /// Bus event broadcast after a passing aggregate.
    pub emit: Option<String>,
}

impl AssumeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn emit(mut self, event: impl Into<String>) -> Self {
        self.emit = Some(event.into());
        self
    }

    pub(crate) fn refuted_message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_REFUTED_MESSAGE)
    }
}

impl From<&str> for AssumeOptions {
    fn from(message: &str) -> Self {
        Self::new().message(message)
    }
}

impl From<String> for AssumeOptions {
    fn from(message: String) -> Self {
        Self::new().message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_becomes_message() {
        let opts = AssumeOptions::from("must hold");
        assert_eq!(opts.message.as_deref(), Some("must hold"));
        assert!(!opts.quiet);
        assert_eq!(opts.refuted_message(), "must hold");
    }

    #[test]
    fn default_message() {
        assert_eq!(AssumeOptions::default().refuted_message(), DEFAULT_REFUTED_MESSAGE);
    }

    #[test]
    fn deserializes_partial_options() {
        let opts: AssumeOptions = serde_json::from_str(r#"{"quiet": true}"#).unwrap();
        assert_eq!(opts, AssumeOptions::new().quiet(true));
    }
}
