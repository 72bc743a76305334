//! # AssumptionError — Structured Refutation
//!
//! Every refuted check surfaces as an [`AssumptionError`]. The error carries
//! everything needed to locate and reproduce the failure without a debugger:
//!
//! - the check's own description,
//! - a bounded preview of the subject value,
//! - the method-call trail that led to the failing check,
//! - the call site that created the chain, when captured,
//! - the underlying cause when the predicate itself errored.
//!
//! ## Design
//!
//! The error is immutable once built. Its `Display` output is the composed
//! multi-line message, so an uncaught error is self-explanatory in logs.
//! It is `Clone` (the cause is shared behind an `Arc`) so the same refutation
//! can be recorded, re-propagated and handed to handlers.
//!
//! Callers holding an `anyhow::Error` use [`is_assumption_error()`] to decide
//! whether a failure is a recoverable refutation or a foreign error that
//! must propagate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tag::TypeTag;
use crate::temporal::Timestamp;

/// Snapshot of the queued check that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// Position of the link in the chain's queue.
    pub index: usize,
    /// Tag recorded when the link was queued.
    pub type_tag: TypeTag,
    /// Method that queued the link.
    pub method: String,
}

impl std::fmt::Display for LinkSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}.{}", self.index, self.type_tag, self.method)
    }
}

/// Raw parts from which an [`AssumptionError`] is composed.
#[derive(Debug, Default)]
pub struct FailureContext {
    /// The check's own failure description.
    pub message: String,
    /// The failing link, when the failure came from a chain.
    pub link: Option<LinkSnapshot>,
    /// Preview of the subject value.
    pub value_preview: Option<String>,
    /// `type.method` entries up to and including the failing call.
    pub chain_trace: Vec<String>,
    /// Where the chain was created.
    pub capture_location: Option<String>,
    /// Underlying error, when the predicate itself failed.
    pub cause: Option<anyhow::Error>,
}

/// A refuted assumption with its full diagnostic trail.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct AssumptionError {
    message: String,
    original: String,
    link: Option<LinkSnapshot>,
    value_preview: Option<String>,
    timestamp: Timestamp,
    #[source]
    cause: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
    chain_trace: Vec<String>,
    capture_location: Option<String>,
}

impl AssumptionError {
    /// Stable discriminator shared by every instance.
    pub const KIND: &'static str = "AssumptionError";

    /// A bare refutation with no chain context (used by aggregates).
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_context(FailureContext {
            message: message.into(),
            ..FailureContext::default()
        })
    }

    /// Compose an error from its parts.
    pub fn from_context(ctx: FailureContext) -> Self {
        let message = compose(&ctx);
        let cause = ctx.cause.map(|e| {
            let boxed: Box<dyn std::error::Error + Send + Sync + 'static> = e.into();
            Arc::from(boxed)
        });
        Self {
            message,
            original: ctx.message,
            link: ctx.link,
            value_preview: ctx.value_preview,
            timestamp: Timestamp::now(),
            cause,
            chain_trace: ctx.chain_trace,
            capture_location: ctx.capture_location,
        }
    }

    /// Always `"AssumptionError"`.
    pub fn kind(&self) -> &'static str {
        Self::KIND
    }

    /// The full composed message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failing check's own description, without enrichment.
    pub fn original_message(&self) -> &str {
        &self.original
    }

    /// The failing link, when the error came from a chain.
    pub fn link_snapshot(&self) -> Option<&LinkSnapshot> {
        self.link.as_ref()
    }

    /// Bounded rendering of the subject value.
    pub fn value_preview(&self) -> Option<&str> {
        self.value_preview.as_deref()
    }

    /// When the failure was recorded.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// `type.method` entries up to and including the failing call.
    pub fn chain_trace(&self) -> &[String] {
        &self.chain_trace
    }

    /// Call site that created the chain, when capture is enabled.
    pub fn capture_location(&self) -> Option<&str> {
        self.capture_location.as_deref()
    }

    /// The underlying error, when the predicate itself failed.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

fn compose(ctx: &FailureContext) -> String {
    let mut out = ctx.message.clone();
    if let Some(preview) = &ctx.value_preview {
        out.push_str("\n  value: ");
        out.push_str(preview);
    }
    if !ctx.chain_trace.is_empty() {
        out.push_str("\n  chain: ");
        out.push_str(&ctx.chain_trace.join(" → "));
    }
    if let Some(location) = &ctx.capture_location {
        out.push_str("\n  created at: ");
        out.push_str(location);
    }
    if let Some(cause) = &ctx.cause {
        out.push_str("\n  cause: ");
        out.push_str(&cause.to_string());
    }
    out
}

/// Whether `err` is (or wraps) an [`AssumptionError`].
pub fn is_assumption_error(err: &anyhow::Error) -> bool {
    as_assumption_error(err).is_some()
}

/// Borrow the [`AssumptionError`] inside `err`, if it is one.
///
/// Checks the outermost error and then its context chain, so an
/// `AssumptionError` passed through `anyhow::Context::context` is still
/// recognized.
pub fn as_assumption_error(err: &anyhow::Error) -> Option<&AssumptionError> {
    err.chain().find_map(|e| e.downcast_ref::<AssumptionError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    fn sample() -> AssumptionError {
        AssumptionError::from_context(FailureContext {
            message: "Expected number, got string".into(),
            link: Some(LinkSnapshot {
                index: 0,
                type_tag: TypeTag::Number,
                method: "is_number".into(),
            }),
            value_preview: Some("\"x\"".into()),
            chain_trace: vec!["number.is_number".into()],
            capture_location: Some("src/lib.rs:10:5".into()),
            cause: None,
        })
    }

    #[test]
    fn message_embeds_every_part() {
        let err = sample();
        let text = err.to_string();
        assert!(text.starts_with("Expected number, got string"));
        assert!(text.contains("value: \"x\""));
        assert!(text.contains("chain: number.is_number"));
        assert!(text.contains("created at: src/lib.rs:10:5"));
        assert_eq!(err.original_message(), "Expected number, got string");
    }

    #[test]
    fn bare_error_has_only_the_message() {
        let err = AssumptionError::new("Assumption refuted");
        assert_eq!(err.to_string(), "Assumption refuted");
        assert!(err.chain_trace().is_empty());
        assert!(err.link_snapshot().is_none());
        assert_eq!(err.kind(), "AssumptionError");
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let err = AssumptionError::from_context(FailureContext {
            message: "Predicate failed".into(),
            cause: Some(anyhow::anyhow!("disk on fire")),
            ..FailureContext::default()
        });
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk on fire");
        assert!(err.to_string().contains("cause: disk on fire"));
    }

    #[test]
    fn discriminator_sees_through_context() {
        let wrapped: anyhow::Error = anyhow::Error::new(sample());
        assert!(is_assumption_error(&wrapped));

        let with_context = Err::<(), _>(sample())
            .context("while validating payload")
            .unwrap_err();
        assert!(is_assumption_error(&with_context));

        let foreign = anyhow::anyhow!("boom");
        assert!(!is_assumption_error(&foreign));
    }

    #[test]
    fn clones_share_the_same_diagnostics() {
        let err = sample();
        let copy = err.clone();
        assert_eq!(err.message(), copy.message());
        assert_eq!(err.timestamp(), copy.timestamp());
        assert_eq!(err.link_snapshot(), copy.link_snapshot());
    }
}
