//! Items accepted by the aggregator.

use assume_chain::{Chain, Runnable, TagState};

/// One item of an aggregate.
///
/// Built from a `bool`, a chain (owned or borrowed), or one of the
/// closure constructors. Closures have no `From` impl because a blanket one
/// would overlap with `bool`.
pub enum Assumption<'a> {
    /// Already evaluated.
    Holds(bool),
    /// Zero-argument check; `Ok(false)` refutes, `Err` fails by error.
    Check(Box<dyn FnOnce() -> anyhow::Result<bool> + 'a>),
    /// A chain, run when the aggregate evaluates it.
    Chain(Box<dyn Runnable + 'a>),
}

/// Result of evaluating one item.
#[derive(Debug)]
pub(crate) enum Outcome {
    Holds,
    Refuted,
    Errored(anyhow::Error),
}

impl<'a> Assumption<'a> {
    /// A fallible boolean check.
    pub fn check<F>(f: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<bool> + 'a,
    {
        Self::Check(Box::new(f))
    }

    /// A fallible check that holds unless it returns `Err`.
    pub fn ensure<F>(f: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + 'a,
    {
        Self::Check(Box::new(move || f().map(|()| true)))
    }

    /// An infallible boolean check.
    pub fn predicate<F>(f: F) -> Self
    where
        F: FnOnce() -> bool + 'a,
    {
        Self::Check(Box::new(move || Ok(f())))
    }

    pub(crate) fn evaluate(self) -> Outcome {
        match self {
            Self::Holds(true) => Outcome::Holds,
            Self::Holds(false) => Outcome::Refuted,
            Self::Check(f) => match f() {
                Ok(true) => Outcome::Holds,
                Ok(false) => Outcome::Refuted,
                Err(e) => Outcome::Errored(e),
            },
            Self::Chain(chain) => match chain.run() {
                Ok(()) => Outcome::Holds,
                Err(e) => Outcome::Errored(anyhow::Error::new(e)),
            },
        }
    }
}

impl From<bool> for Assumption<'_> {
    fn from(holds: bool) -> Self {
        Self::Holds(holds)
    }
}

impl<S: TagState> From<Chain<S>> for Assumption<'_> {
    fn from(chain: Chain<S>) -> Self {
        Self::Chain(Box::new(chain))
    }
}

impl<'a, S: TagState> From<&'a Chain<S>> for Assumption<'a> {
    fn from(chain: &'a Chain<S>) -> Self {
        Self::Chain(Box::new(chain))
    }
}

impl std::fmt::Debug for Assumption<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Holds(b) => f.debug_tuple("Holds").field(b).finish(),
            Self::Check(_) => f.write_str("Check(..)"),
            Self::Chain(_) => f.write_str("Chain(..)"),
        }
    }
}

/// Shorthand for [`Assumption::check`].
pub fn check<'a, F>(f: F) -> Assumption<'a>
where
    F: FnOnce() -> anyhow::Result<bool> + 'a,
{
    Assumption::check(f)
}
