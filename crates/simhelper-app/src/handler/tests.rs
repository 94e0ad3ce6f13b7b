use super::*;
use crate::actions::{ActionKind, Step};
use crate::state::AppState;
use simhelper_core::{DeviceState, DeviceType, InstalledApp, TypeFilter};
use simhelper_daemon::test_utils::{test_device, test_device_full};
use simhelper_daemon::SimctlCommand;

#[test]
fn test_refresh_spawns_listing() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::RefreshDevices);
    assert_eq!(result.action, Some(UpdateAction::RefreshDevices));
}

#[test]
fn test_refresh_clears_previous_listing_error() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::DeviceRefreshFailed {
            error: "program not found".to_string(),
        },
    );
    assert!(state.last_refresh_error.is_some());

    update(&mut state, Message::RefreshDevices);

    assert!(state.last_refresh_error.is_none());
    assert_eq!(state.refresh_count, 0);
}

#[test]
fn test_devices_refreshed_replaces_registry() {
    let mut state = AppState::new();
    state.set_devices(vec![test_device("Old", "U0")]);

    let result = update(
        &mut state,
        Message::DevicesRefreshed {
            devices: vec![test_device("iPhone 15", "U1"), test_device("iPad", "U2")],
        },
    );

    assert!(result.action.is_none());
    assert_eq!(state.devices.len(), 2);
    assert!(state.find_device("U0").is_none());
}

#[test]
fn test_refresh_failure_keeps_previous_devices() {
    let mut state = AppState::new();
    state.set_devices(vec![test_device("iPhone 15", "U1")]);

    update(
        &mut state,
        Message::DeviceRefreshFailed {
            error: "program not found".to_string(),
        },
    );

    assert_eq!(state.devices.len(), 1);
    assert_eq!(
        state.last_refresh_error.as_deref(),
        Some("program not found")
    );
}

#[test]
fn test_set_filter() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::SetTypeFilter(TypeFilter::Only(DeviceType::IPad)),
    );
    assert_eq!(state.filter, TypeFilter::Only(DeviceType::IPad));
}

#[test]
fn test_select_and_clear() {
    let mut state = AppState::new();
    update(&mut state, Message::SelectDevice(test_device("iPhone 15", "U1")));
    assert_eq!(state.selected_device.as_ref().unwrap().udid, "U1");

    update(&mut state, Message::ClearSelection);
    assert!(state.selected_device.is_none());
}

#[test]
fn test_boot_produces_boot_plan() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::BootDevice {
            device: test_device("iPhone 15", "U1"),
        },
    );

    match result.action {
        Some(UpdateAction::RunPlan(plan)) => {
            assert_eq!(plan.kind, ActionKind::Boot);
            assert_eq!(plan.udid, "U1");
        }
        other => panic!("expected plan, got {other:?}"),
    }
    assert_eq!(state.pending_actions, 1);
}

#[test]
fn test_shutdown_produces_shutdown_plan() {
    let mut state = AppState::new();
    let device = test_device_full("iPhone 15", "U1", "17.4", DeviceState::Booted);
    let result = update(&mut state, Message::ShutdownDevice { device });

    assert!(matches!(
        result.action,
        Some(UpdateAction::RunPlan(ref plan)) if plan.kind == ActionKind::Shutdown
    ));
}

#[test]
fn test_launch_targets_bundle_id() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::LaunchApp {
            app: InstalledApp::new("com.example.app", Some("Example".to_string())),
            device: test_device("iPhone 15", "U1"),
        },
    );

    let Some(UpdateAction::RunPlan(plan)) = result.action else {
        panic!("expected plan");
    };
    assert_eq!(
        plan.steps[0],
        Step::Run(SimctlCommand::Launch {
            udid: "U1".to_string(),
            bundle_id: "com.example.app".to_string(),
        })
    );
}

#[test]
fn test_action_finished_decrements_pending() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::BootDevice {
            device: test_device("iPhone 15", "U1"),
        },
    );
    update(
        &mut state,
        Message::ActionFinished {
            kind: ActionKind::Boot,
            udid: "U1".to_string(),
        },
    );
    assert_eq!(state.pending_actions, 0);

    // A stray completion never underflows
    update(
        &mut state,
        Message::ActionFinished {
            kind: ActionKind::Boot,
            udid: "U1".to_string(),
        },
    );
    assert_eq!(state.pending_actions, 0);
}

#[test]
fn test_fetch_apps_starts_loading() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::FetchInstalledApps {
            device: test_device("iPhone 15", "U1"),
        },
    );

    assert!(state.is_loading_apps);
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchInstalledApps {
            fetch_id: 1,
            udid: "U1".to_string(),
        })
    );
}

#[test]
fn test_fetched_apps_are_applied() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::FetchInstalledApps {
            device: test_device("iPhone 15", "U1"),
        },
    );
    update(
        &mut state,
        Message::InstalledAppsFetched {
            fetch_id: 1,
            apps: vec![InstalledApp::new("com.example", None)],
        },
    );

    assert!(!state.is_loading_apps);
    assert_eq!(state.installed_apps.len(), 1);
}

#[test]
fn test_fetch_failure_sets_error() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::FetchInstalledApps {
            device: test_device("iPhone 15", "U1"),
        },
    );
    update(
        &mut state,
        Message::InstalledAppsFetchFailed {
            fetch_id: 1,
            error: "Failed to fetch apps.\nInvalid device".to_string(),
        },
    );

    assert!(!state.is_loading_apps);
    assert!(state.installed_apps.is_empty());
    assert_eq!(
        state.app_fetch_error.as_deref(),
        Some("Failed to fetch apps.\nInvalid device")
    );
}

#[test]
fn test_superseded_fetch_is_discarded() {
    let mut state = AppState::new();
    for udid in ["U1", "U2"] {
        update(
            &mut state,
            Message::FetchInstalledApps {
                device: test_device("iPhone 15", udid),
            },
        );
    }

    update(
        &mut state,
        Message::InstalledAppsFetched {
            fetch_id: 1,
            apps: vec![InstalledApp::new("com.from.first", None)],
        },
    );

    assert!(state.is_loading_apps);
    assert!(state.installed_apps.is_empty());
    assert_eq!(state.apps_udid.as_deref(), Some("U2"));
}

#[test]
fn test_quit() {
    let mut state = AppState::new();
    update(&mut state, Message::Quit);
    assert!(state.should_quit());
}
