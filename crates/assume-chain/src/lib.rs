//! # assume-chain — Deferred Assumption Chains
//!
//! Bind a value, queue checks fluently, run them later:
//!
//! ```
//! use assume_chain::assume;
//!
//! let age = assume(42).is_number().integer().between(0, 150);
//! assert!(age.try_run());
//!
//! let err = assume("x").is_number().run().unwrap_err();
//! assert!(err.to_string().contains("Expected number"));
//! ```
//!
//! ## Typestate
//!
//! [`Chain<S>`] carries its type tag in `S`. Guards (`is_string`,
//! `is_number`, ...) exist only on `Chain<Unknown>` and move the chain to a
//! narrowed state, which unlocks that state's check group. Calling a
//! string check on an unnarrowed chain is a compile error, not a runtime one.
//!
//! ## Execution
//!
//! Nothing runs until [`Chain::run`] (returns `Result`), [`Chain::try_run`]
//! (returns `bool`), [`Chain::value`] or [`Chain::commit`]. The first failing
//! check stops execution and is reported as an
//! [`AssumptionError`](assume_core::AssumptionError) carrying a value
//! preview, the trace up to the failing call, and the chain's creation site.

pub mod chain;
mod guards;
pub mod link;
mod ops;
pub mod predicates;
mod recorder;
pub mod tag;

use std::sync::Arc;

use assume_core::{Context, Value};

pub use chain::{Chain, TraceEntry};
pub use link::{Condition, Runnable};
pub use tag::{
    Arr, Bool, Class, Date, Elem, Null, Num, Obj, Present, Str, TagState, Undefined, Unknown,
};

/// Start a chain on `value` using the process-wide context.
#[track_caller]
pub fn assume(value: impl Into<Value>) -> Chain<Unknown> {
    Chain::new(value)
}

/// Alias of [`assume`].
#[track_caller]
pub fn that(value: impl Into<Value>) -> Chain<Unknown> {
    Chain::new(value)
}

/// Start chains from an explicit context: `ctx.assume(value)`.
pub trait ContextExt {
    fn assume(&self, value: impl Into<Value>) -> Chain<Unknown>;
}

impl ContextExt for Arc<Context> {
    #[track_caller]
    fn assume(&self, value: impl Into<Value>) -> Chain<Unknown> {
        Chain::with_context(Arc::clone(self), value)
    }
}
