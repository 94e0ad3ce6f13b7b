//! Application state (Model in TEA pattern)

use simhelper_core::{Device, InstalledApp, TypeFilter};
use simhelper_daemon::{available_types, filter_by_type, find_device, group_by_version};

/// Complete application state: the device registry plus app-list progress
///
/// Only [`crate::handler::update`] mutates this. Background tasks report
/// through messages.
#[derive(Debug, Default)]
pub struct AppState {
    /// Devices from the most recent successful listing
    pub devices: Vec<Device>,

    /// Number of listings applied so far
    pub refresh_count: u64,

    /// Message from the most recent failed listing, cleared by a new request
    pub last_refresh_error: Option<String>,

    /// Active device-type filter
    pub filter: TypeFilter,

    /// Selected device, held by value
    pub selected_device: Option<Device>,

    /// Apps for the device whose list was most recently requested
    pub installed_apps: Vec<InstalledApp>,

    /// UDID the app list belongs to
    pub apps_udid: Option<String>,

    /// True while an app fetch is outstanding
    pub is_loading_apps: bool,

    /// Message from a failed app fetch
    pub app_fetch_error: Option<String>,

    /// Generation of the most recent app fetch; older results are stale
    pub apps_fetch_id: u64,

    /// Device actions started but not yet finished
    pub pending_actions: usize,

    quitting: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────
    // Device registry
    // ─────────────────────────────────────────────────────────

    /// Replace the device set wholesale
    pub fn set_devices(&mut self, devices: Vec<Device>) {
        self.devices = devices;
        self.refresh_count += 1;
        self.last_refresh_error = None;
    }

    /// Devices passing the active filter, in listing order
    pub fn filtered_devices(&self) -> Vec<&Device> {
        filter_by_type(&self.devices, self.filter)
    }

    /// Devices passing `filter`, in listing order
    pub fn filtered_by_type(&self, filter: TypeFilter) -> Vec<&Device> {
        filter_by_type(&self.devices, filter)
    }

    /// Filtered devices grouped by OS version, newest first
    pub fn grouped_by_version(&self) -> Vec<(&str, Vec<&Device>)> {
        group_by_version(self.filtered_devices())
    }

    /// Filter choices for the current device set
    pub fn available_types(&self) -> Vec<TypeFilter> {
        available_types(&self.devices)
    }

    pub fn find_device(&self, udid: &str) -> Option<&Device> {
        find_device(&self.devices, udid)
    }

    // ─────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────

    pub fn select_device(&mut self, device: Device) {
        self.selected_device = Some(device);
    }

    pub fn clear_selection(&mut self) {
        self.selected_device = None;
    }

    /// The current registry record for the selected device
    ///
    /// The selection is a snapshot; after a refresh the registry may hold a
    /// newer state for the same UDID, or none at all.
    pub fn resolve_selected(&self) -> Option<&Device> {
        self.selected_device
            .as_ref()
            .and_then(|selected| self.find_device(&selected.udid))
    }

    // ─────────────────────────────────────────────────────────
    // Installed apps
    // ─────────────────────────────────────────────────────────

    /// Start a new app fetch, discarding the previous list and error
    ///
    /// Returns the generation the result must carry to be accepted.
    pub fn begin_app_fetch(&mut self, udid: &str) -> u64 {
        self.apps_fetch_id += 1;
        self.apps_udid = Some(udid.to_string());
        self.installed_apps.clear();
        self.app_fetch_error = None;
        self.is_loading_apps = true;
        self.apps_fetch_id
    }

    /// Apply a fetched app list; returns false when the result is stale
    pub fn finish_app_fetch(&mut self, fetch_id: u64, apps: Vec<InstalledApp>) -> bool {
        if fetch_id != self.apps_fetch_id {
            return false;
        }
        self.installed_apps = apps;
        self.app_fetch_error = None;
        self.is_loading_apps = false;
        true
    }

    /// Record a failed app fetch; returns false when the result is stale
    pub fn fail_app_fetch(&mut self, fetch_id: u64, error: String) -> bool {
        if fetch_id != self.apps_fetch_id {
            return false;
        }
        self.installed_apps.clear();
        self.app_fetch_error = Some(error);
        self.is_loading_apps = false;
        true
    }

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────

    pub fn request_quit(&mut self) {
        self.quitting = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simhelper_core::{DeviceState, DeviceType};
    use simhelper_daemon::test_utils::{test_device, test_device_full};

    fn sample_devices() -> Vec<Device> {
        vec![
            test_device_full("iPhone 15", "U1", "17.4", DeviceState::Booted),
            test_device_full("iPad Air", "U2", "17.4", DeviceState::Shutdown),
            test_device_full("iPhone 11", "U3", "16.0", DeviceState::Shutdown),
        ]
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = AppState::new();
        assert!(state.devices.is_empty());
        assert_eq!(state.filter, TypeFilter::All);
        assert!(!state.is_loading_apps);
        assert!(!state.should_quit());
    }

    #[test]
    fn test_set_devices_replaces_and_clears_error() {
        let mut state = AppState::new();
        state.last_refresh_error = Some("boom".to_string());
        state.set_devices(sample_devices());
        state.set_devices(vec![test_device("iPhone SE", "U9")]);

        assert_eq!(state.devices.len(), 1);
        assert_eq!(state.refresh_count, 2);
        assert!(state.last_refresh_error.is_none());
    }

    #[test]
    fn test_grouping_respects_filter() {
        let mut state = AppState::new();
        state.set_devices(sample_devices());
        state.filter = TypeFilter::Only(DeviceType::IPhone);

        let groups = state.grouped_by_version();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "17.4");
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[1].0, "16.0");
    }

    #[test]
    fn test_filtered_by_type_ignores_active_filter() {
        let mut state = AppState::new();
        state.set_devices(sample_devices());
        state.filter = TypeFilter::Only(DeviceType::IPad);

        assert_eq!(state.filtered_by_type(TypeFilter::All).len(), 3);
        assert_eq!(state.filtered_devices().len(), 1);
    }

    #[test]
    fn test_resolve_selected_follows_refresh() {
        let mut state = AppState::new();
        state.set_devices(sample_devices());
        let selected = state.find_device("U2").cloned().unwrap();
        state.select_device(selected);

        state.set_devices(vec![test_device_full(
            "iPad Air",
            "U2",
            "17.4",
            DeviceState::Booted,
        )]);

        assert_eq!(
            state.selected_device.as_ref().unwrap().state,
            DeviceState::Shutdown
        );
        assert_eq!(state.resolve_selected().unwrap().state, DeviceState::Booted);

        state.set_devices(Vec::new());
        assert!(state.resolve_selected().is_none());
    }

    #[test]
    fn test_app_fetch_lifecycle() {
        let mut state = AppState::new();
        let id = state.begin_app_fetch("U1");
        assert!(state.is_loading_apps);
        assert_eq!(state.apps_udid.as_deref(), Some("U1"));

        let apps = vec![InstalledApp::new("com.example", None)];
        assert!(state.finish_app_fetch(id, apps));
        assert!(!state.is_loading_apps);
        assert_eq!(state.installed_apps.len(), 1);
        assert!(state.app_fetch_error.is_none());
    }

    #[test]
    fn test_failure_clears_list() {
        let mut state = AppState::new();
        let first = state.begin_app_fetch("U1");
        state.finish_app_fetch(first, vec![InstalledApp::new("com.example", None)]);

        let second = state.begin_app_fetch("U1");
        assert!(state.installed_apps.is_empty());
        assert!(state.fail_app_fetch(second, "Failed to fetch apps.\n".to_string()));

        assert!(state.installed_apps.is_empty());
        assert!(state.app_fetch_error.is_some());
    }

    #[test]
    fn test_stale_fetch_results_are_ignored() {
        let mut state = AppState::new();
        let old = state.begin_app_fetch("U1");
        let current = state.begin_app_fetch("U2");

        assert!(!state.finish_app_fetch(old, vec![InstalledApp::new("com.old", None)]));
        assert!(state.is_loading_apps);
        assert!(state.installed_apps.is_empty());

        assert!(!state.fail_app_fetch(old, "late".to_string()));
        assert!(state.app_fetch_error.is_none());

        assert!(state.finish_app_fetch(current, Vec::new()));
        assert!(!state.is_loading_apps);
    }
}
