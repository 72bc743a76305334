//! # Engine Context
//!
//! Bundles the process-wide diagnostic state: configuration, the history
//! ring and the event bus. [`Context::global()`] is initialized lazily from
//! the environment on first use and lives for the rest of the process.
//! Tests that need isolation construct their own with [`Context::new()`] and
//! hand it to the chain and aggregate constructors.

use std::panic::Location;
use std::sync::{Arc, OnceLock};

use crate::bus::EventBus;
use crate::config::AssumeConfig;
use crate::history::{History, HistoryEntry};
use crate::location::{CallerLocation, LocationCapture, NoLocation};
use crate::preview::PreviewLimits;

static GLOBAL: OnceLock<Arc<Context>> = OnceLock::new();

/// Shared diagnostic state for chains and aggregates.
#[derive(Debug)]
pub struct Context {
    config: AssumeConfig,
    history: History,
    bus: EventBus,
    locator: Box<dyn LocationCapture>,
}

impl Context {
    /// Create an isolated context.
    pub fn new(config: AssumeConfig) -> Arc<Self> {
        let locator: Box<dyn LocationCapture> = if config.capture_location {
            Box::new(CallerLocation)
        } else {
            Box::new(NoLocation)
        };
        Self::with_locator(config, locator)
    }

    /// Create an isolated context with a custom call-site renderer.
    pub fn with_locator(config: AssumeConfig, locator: Box<dyn LocationCapture>) -> Arc<Self> {
        Arc::new(Self {
            history: History::new(config.history_limit),
            bus: EventBus::new(),
            config,
            locator,
        })
    }

    /// The process-wide context.
    ///
    /// Configured from `ASSUME_*` environment variables; invalid values are
    /// logged and replaced by defaults.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| {
            let config = AssumeConfig::from_env().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid assumption config in environment; using defaults");
                AssumeConfig::default()
            });
            Self::new(config)
        }))
    }

    /// Configuration the context was built with.
    pub fn config(&self) -> &AssumeConfig {
        &self.config
    }

    /// Bounds for value previews in error messages.
    pub fn preview_limits(&self) -> &PreviewLimits {
        &self.config.preview
    }

    /// The history ring.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The event bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Render `site` through the configured capture capability.
    pub fn capture_location(&self, site: &Location<'_>) -> Option<String> {
        self.locator.capture(site)
    }
}

/// Snapshot of the global history ring.
pub fn get_history() -> Vec<HistoryEntry> {
    Context::global().history().snapshot()
}

/// Empty the global history ring.
pub fn clear_history() {
    Context::global().history().clear();
}

/// Change the global history limit.
pub fn set_history_limit(limit: usize) {
    Context::global().history().set_limit(limit);
}
