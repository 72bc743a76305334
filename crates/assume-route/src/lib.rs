//! # assume-route — Absorbing Refuted Assumptions at Call Boundaries
//!
//! Route adapters wrap a function so callers never see a refuted assumption
//! as an error:
//!
//! - [`wrap_sync`] / [`wrap_async`] return a fixed fallback when the wrapped
//!   function fails with an [`AssumptionError`](assume_core::AssumptionError).
//!   Foreign errors still propagate unless `intercept_all(true)` is set.
//! - [`assumed_route`] / [`assumed_route_async`] hand any error plus the
//!   original arguments to an `on_refuted` callback and return its value.
//! - [`def_ref_handler`] builds an `on_refuted` callback returning a default.
//!
//! The async adapters add exactly one suspension point, the wrapped future.
//! There is no timeout and no cancellation handling.

mod fallback;
mod handler;
mod policy;

pub use fallback::{wrap_async, wrap_sync, AsyncRoute, SyncRoute};
pub use handler::{
    assumed_route, assumed_route_async, def_ref_handler, AssumedAsyncRoute, AssumedRoute,
};
