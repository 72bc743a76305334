//! Deferred checks and the conditions accepted by `and` / `or`.

use std::sync::Arc;

use assume_core::{AssumptionError, TypeTag, Value};

/// Why a single queued check did not pass.
#[derive(Debug)]
pub(crate) enum LinkFailure {
    /// The predicate returned `false`.
    Refuted(String),
    /// The predicate itself errored with a foreign error.
    Errored { message: String, cause: anyhow::Error },
    /// A nested chain already produced a structured refutation.
    Propagated(AssumptionError),
}

impl LinkFailure {
    pub(crate) fn refuted(message: impl Into<String>) -> Self {
        Self::Refuted(message.into())
    }

    /// Classify an error raised by caller code.
    pub(crate) fn from_error(message: impl Into<String>, err: anyhow::Error) -> Self {
        match err.downcast::<AssumptionError>() {
            Ok(nested) => Self::Propagated(nested),
            Err(cause) => Self::Errored {
                message: message.into(),
                cause,
            },
        }
    }
}

pub(crate) type CheckFn = Arc<dyn Fn(&Value) -> Result<(), LinkFailure> + Send + Sync>;

/// One queued check.
#[derive(Clone)]
pub(crate) struct ChainLink {
    pub(crate) execute: CheckFn,
    pub(crate) type_tag: TypeTag,
    pub(crate) method: &'static str,
    /// Position of the call that queued this link in the chain's trace.
    pub(crate) trace_index: usize,
    /// Replaces the check's default failure description.
    pub(crate) message: Option<Arc<str>>,
}

impl ChainLink {
    pub(crate) fn check(&self, subject: &Value) -> Result<(), LinkFailure> {
        (self.execute)(subject)
    }
}

/// Anything that can be executed as a whole assumption.
///
/// Implemented by every `Chain<S>`; lets chains of different states be
/// nested inside `and` / `or` or collected by the aggregator.
pub trait Runnable: Send + Sync {
    fn run(&self) -> Result<(), AssumptionError>;

    fn try_run(&self) -> bool {
        self.run().is_ok()
    }
}

impl<T: Runnable + ?Sized> Runnable for &T {
    fn run(&self) -> Result<(), AssumptionError> {
        (**self).run()
    }
}

/// Right-hand side of `and` / `or`.
#[derive(Clone)]
pub enum Condition {
    /// A value already known when the chain is built.
    Holds(bool),
    /// A predicate evaluated against the subject when the chain runs.
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
    /// Another chain, run when this chain runs.
    Chain(Arc<dyn Runnable>),
}

impl Condition {
    /// A predicate over the subject.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    pub(crate) fn evaluate(&self, subject: &Value) -> Result<(), LinkFailure> {
        match self {
            Self::Holds(true) => Ok(()),
            Self::Holds(false) => Err(LinkFailure::refuted("Condition does not hold")),
            Self::Predicate(predicate) => {
                if predicate(subject) {
                    Ok(())
                } else {
                    Err(LinkFailure::refuted("Condition predicate returned false"))
                }
            }
            Self::Chain(chain) => chain.run().map_err(LinkFailure::Propagated),
        }
    }
}

impl From<bool> for Condition {
    fn from(holds: bool) -> Self {
        Self::Holds(holds)
    }
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Holds(b) => f.debug_tuple("Holds").field(b).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Chain(_) => f.write_str("Chain(..)"),
        }
    }
}
