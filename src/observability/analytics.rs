//! Process-wide analytics app.
//!
//! The app is created at most once per process. Later calls to [`init`]
//! return the existing instance and ignore their configuration, so modules
//! that initialize it independently all share one app.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use crate::config::AnalyticsConfig;

static APP: OnceLock<AnalyticsApp> = OnceLock::new();

/// Analytics client configured from the project identifiers.
#[derive(Debug)]
pub struct AnalyticsApp {
    config: AnalyticsConfig,
    events: AtomicU64,
}

impl AnalyticsApp {
    fn new(config: AnalyticsConfig) -> Self {
        Self {
            config,
            events: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    pub fn measurement_id(&self) -> &str {
        &self.config.measurement_id
    }

    /// Record a named event. Disabled apps drop events.
    pub fn log_event(&self, name: &str) {
        if !self.config.enabled {
            return;
        }
        let seq = self.events.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            target: "grit_nft::analytics",
            event = name,
            seq,
            measurement_id = %self.config.measurement_id,
            "Analytics event"
        );
    }

    /// Number of events recorded since startup.
    pub fn event_count(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }
}

/// Initialize the analytics app, or return the one already initialized.
pub fn init(config: &AnalyticsConfig) -> &'static AnalyticsApp {
    let mut created = false;
    let app = APP.get_or_init(|| {
        created = true;
        AnalyticsApp::new(config.clone())
    });

    if created {
        tracing::info!(
            project_id = %app.project_id(),
            enabled = app.is_enabled(),
            "Initialize analytics app"
        );
    } else {
        tracing::info!(
            project_id = %app.project_id(),
            "Analytics app is already initialized"
        );
    }
    app
}

pub fn is_initialized() -> bool {
    APP.get().is_some()
}

/// The initialized app, if any.
pub fn app() -> Option<&'static AnalyticsApp> {
    APP.get()
}

/// Log an event on the initialized app; a no-op before [`init`].
pub fn log_event(name: &str) {
    if let Some(app) = APP.get() {
        app.log_event(name);
    }
}
