//! Main update function - handles state transitions (TEA pattern)

use simhelper_core::prelude::*;

use crate::actions::ActionPlan;
use crate::message::Message;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns an optional action to perform
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Device Registry
        // ─────────────────────────────────────────────────────────
        Message::RefreshDevices => {
            state.last_refresh_error = None;
            UpdateResult::action(UpdateAction::RefreshDevices)
        }

        Message::DevicesRefreshed { devices } => {
            debug!("Registry now holds {} device(s)", devices.len());
            state.set_devices(devices);
            UpdateResult::none()
        }

        Message::DeviceRefreshFailed { error } => {
            // Previous device set stays in place
            state.last_refresh_error = Some(error);
            UpdateResult::none()
        }

        Message::SetTypeFilter(filter) => {
            state.filter = filter;
            UpdateResult::none()
        }

        Message::SelectDevice(device) => {
            state.select_device(device);
            UpdateResult::none()
        }

        Message::ClearSelection => {
            state.clear_selection();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Device Actions
        // ─────────────────────────────────────────────────────────
        Message::BootDevice { device } => {
            info!("Booting {} ({})", device.name, device.udid);
            start_plan(state, ActionPlan::boot(device.udid))
        }

        Message::ShutdownDevice { device } => {
            info!("Shutting down {} ({})", device.name, device.udid);
            start_plan(state, ActionPlan::shutdown(device.udid))
        }

        Message::LaunchApp { app, device } => {
            info!("Launching {} on {}", app.bundle_id, device.name);
            start_plan(state, ActionPlan::launch(device.udid, app.bundle_id))
        }

        Message::ActionFinished { kind, udid } => {
            state.pending_actions = state.pending_actions.saturating_sub(1);
            info!("{} finished for {}", kind, udid);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Installed Apps
        // ─────────────────────────────────────────────────────────
        Message::FetchInstalledApps { device } => {
            let fetch_id = state.begin_app_fetch(&device.udid);
            UpdateResult::action(UpdateAction::FetchInstalledApps {
                fetch_id,
                udid: device.udid,
            })
        }

        Message::InstalledAppsFetched { fetch_id, apps } => {
            if !state.finish_app_fetch(fetch_id, apps) {
                debug!("Discarding stale app list (fetch {})", fetch_id);
            }
            UpdateResult::none()
        }

        Message::InstalledAppsFetchFailed { fetch_id, error } => {
            if !state.fail_app_fetch(fetch_id, error) {
                debug!("Discarding stale app fetch error (fetch {})", fetch_id);
            }
            UpdateResult::none()
        }
    }
}

fn start_plan(state: &mut AppState, plan: ActionPlan) -> UpdateResult {
    state.pending_actions += 1;
    UpdateResult::action(UpdateAction::RunPlan(plan))
}
