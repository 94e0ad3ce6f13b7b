//! Message types for the application (TEA pattern)

use simhelper_core::{Device, InstalledApp, TypeFilter};

use crate::actions::ActionKind;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Stop the engine loop
    Quit,

    // ─────────────────────────────────────────────────────────
    // Device Registry Messages
    // ─────────────────────────────────────────────────────────
    /// Re-run `simctl list devices`
    RefreshDevices,
    /// A device listing completed; replaces the whole set
    DevicesRefreshed { devices: Vec<Device> },
    /// The listing tool could not be started
    DeviceRefreshFailed { error: String },
    /// Change the device-type filter
    SetTypeFilter(TypeFilter),
    /// Remember a device as the current selection (value copy)
    SelectDevice(Device),
    /// Forget the current selection
    ClearSelection,

    // ─────────────────────────────────────────────────────────
    // Device Action Messages
    // ─────────────────────────────────────────────────────────
    /// Boot, reveal the viewer, refresh
    BootDevice { device: Device },
    /// Shut down, refresh
    ShutdownDevice { device: Device },
    /// Launch an app, reveal the viewer
    LaunchApp { app: InstalledApp, device: Device },
    /// Every step of a device action has run
    ActionFinished { kind: ActionKind, udid: String },

    // ─────────────────────────────────────────────────────────
    // Installed App Messages
    // ─────────────────────────────────────────────────────────
    /// Start loading the app list for a device
    FetchInstalledApps { device: Device },
    /// App list loaded (already sorted)
    InstalledAppsFetched {
        fetch_id: u64,
        apps: Vec<InstalledApp>,
    },
    /// App list could not be loaded
    InstalledAppsFetchFailed { fetch_id: u64, error: String },
}
