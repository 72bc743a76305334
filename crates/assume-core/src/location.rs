//! # Call-Site Capture
//!
//! Chain entry points are `#[track_caller]`, so the caller's
//! [`Location`] is always available for free. Whether (and how) it ends up
//! in diagnostics is a capability behind [`LocationCapture`]. The absence
//! of a location never changes whether a check passes.

use std::panic::Location;

/// Turns a caller location into a diagnostic string.
pub trait LocationCapture: Send + Sync + std::fmt::Debug {
    /// Describe `site`, or `None` to omit it from diagnostics.
    fn capture(&self, site: &Location<'_>) -> Option<String>;
}

/// Renders `file:line:column`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerLocation;

impl LocationCapture for CallerLocation {
    fn capture(&self, site: &Location<'_>) -> Option<String> {
        Some(format!("{}:{}:{}", site.file(), site.line(), site.column()))
    }
}

/// Never records a location.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationCapture for NoLocation {
    fn capture(&self, _site: &Location<'_>) -> Option<String> {
        None
    }
}
