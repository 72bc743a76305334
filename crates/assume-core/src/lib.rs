#![deny(missing_docs)]

//! # assume-core — Foundational Types for the Assumption Engine
//!
//! This crate is the leaf of the workspace. It defines the subject value
//! model every chain is bound to, the runtime type-tag labels, the
//! structured [`AssumptionError`], and the shared diagnostic infrastructure
//! (history ring, event bus, configuration) that the chain, aggregate and
//! route crates build on.
//!
//! ## Key Design Principles
//!
//! 1. **One subject model.** Chains are bound to a [`Value`]. Rust values
//!    convert into it through `From` impls, and `serde_json::Value` converts
//!    losslessly.
//!
//! 2. **One error type for refuted assumptions.** Every failed check is
//!    normalized into [`AssumptionError`]. Callers distinguish it from foreign
//!    errors with [`is_assumption_error()`].
//!
//! 3. **Explicit process-wide state.** History and the event bus live in a
//!    [`Context`]. [`Context::global()`] is the default; tests construct their
//!    own with [`Context::new()`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `assume-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bus;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod location;
pub mod preview;
pub mod tag;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use bus::{BusEvent, EventBus, ListenerId, FAIL_EVENT, PASS_EVENT};
pub use config::{AssumeConfig, ConfigError};
pub use context::{clear_history, get_history, set_history_limit, Context};
pub use error::{
    as_assumption_error, is_assumption_error, AssumptionError, FailureContext, LinkSnapshot,
};
pub use history::{AssumeEvent, History, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use location::{CallerLocation, LocationCapture, NoLocation};
pub use preview::{preview, PreviewLimits};
pub use tag::TypeTag;
pub use temporal::Timestamp;
pub use value::{Element, Kind, Value};
