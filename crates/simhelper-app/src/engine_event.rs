//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`, so subscribers always see a consistent view of the
//! registry.

use crate::actions::ActionKind;

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Device Registry
    // ─────────────────────────────────────────────────────────
    /// A device listing was applied
    DevicesChanged { count: usize },

    /// A device listing failed; the previous set is kept
    DevicesRefreshFailed { error: String },

    // ─────────────────────────────────────────────────────────
    // Installed Apps
    // ─────────────────────────────────────────────────────────
    /// An app fetch started
    AppsLoading { udid: String },

    /// The current app fetch completed
    AppsLoaded { udid: String, count: usize },

    /// The current app fetch failed
    AppsFetchFailed { udid: String, error: String },

    // ─────────────────────────────────────────────────────────
    // Device Actions
    // ─────────────────────────────────────────────────────────
    /// Every step of a device action has run
    ActionFinished { kind: ActionKind, udid: String },
}

impl EngineEvent {
    /// Get the event type name as a string (for logging/filtering).
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::DevicesChanged { .. } => "devices_changed",
            EngineEvent::DevicesRefreshFailed { .. } => "devices_refresh_failed",
            EngineEvent::AppsLoading { .. } => "apps_loading",
            EngineEvent::AppsLoaded { .. } => "apps_loaded",
            EngineEvent::AppsFetchFailed { .. } => "apps_fetch_failed",
            EngineEvent::ActionFinished { .. } => "action_finished",
        }
    }
}
