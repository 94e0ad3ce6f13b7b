//! Test utilities for simctl workflows
//!
//! Provides a scripted [`FakeCommandRunner`] and helpers for building test
//! devices, so workflows can be exercised without spawning processes.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use simhelper_core::prelude::*;
use simhelper_core::{Device, DeviceState};

use crate::commands::SimctlCommand;
use crate::runner::{CommandOutput, CommandRunner, Invocation};
use crate::tool_paths::ToolPaths;

#[derive(Debug, Clone)]
enum Scripted {
    Output(CommandOutput),
    LaunchFailure,
}

/// A command runner that replays scripted outputs
///
/// Responses are keyed by invocation under the default tool paths. When
/// several responses are queued for the same invocation they are returned in
/// order and the last one repeats.
/// Unscripted invocations succeed with empty output. Every call is recorded.
#[derive(Debug, Clone, Default)]
pub struct FakeCommandRunner {
    scripts: Arc<Mutex<HashMap<Invocation, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an output for a command
    pub fn respond(&self, command: &SimctlCommand, output: CommandOutput) {
        self.push(command, Scripted::Output(output));
    }

    /// Make a command fail to start
    pub fn fail_to_launch(&self, command: &SimctlCommand) {
        self.push(command, Scripted::LaunchFailure);
    }

    /// All invocations run so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Invocations rendered as command lines, in order
    pub fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    fn push(&self, command: &SimctlCommand, scripted: Scripted) {
        let invocation = command.invocation(&ToolPaths::default());
        self.scripts
            .lock()
            .expect("scripts lock poisoned")
            .entry(invocation)
            .or_default()
            .push_back(scripted);
    }

    fn next_response(&self, invocation: &Invocation) -> Option<Scripted> {
        let mut scripts = self.scripts.lock().expect("scripts lock poisoned");
        let queue = scripts.get_mut(invocation)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl CommandRunner for FakeCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(invocation.clone());

        match self.next_response(invocation) {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::LaunchFailure) => Err(Error::process_spawn(
                invocation.program(),
                "program not found",
            )),
            None => Ok(CommandOutput::ok("")),
        }
    }
}

/// Creates a shut-down test device on iOS 17.4
pub fn test_device(name: &str, udid: &str) -> Device {
    test_device_full(name, udid, "17.4", DeviceState::Shutdown)
}

/// Creates a test device with full control over the observed fields
pub fn test_device_full(name: &str, udid: &str, version: &str, state: DeviceState) -> Device {
    Device::new(name, version, state, udid)
}

/// Render a `simctl list devices` listing for the given devices
///
/// Devices are grouped under a header per version, in the order given.
pub fn device_listing(devices: &[Device]) -> String {
    let mut out = String::from("== Devices ==\n");
    let mut current: Option<&str> = None;
    for device in devices {
        if current != Some(device.version.as_str()) {
            out.push_str(&format!("-- iOS {} --\n", device.version));
            current = Some(device.version.as_str());
        }
        out.push_str(&format!(
            "    {} ({}) ({})\n",
            device.name, device.udid, device.state
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::parse_device_list;

    #[test]
    fn test_device_defaults() {
        let device = test_device("iPhone 15", "U1");
        assert_eq!(device.version, "17.4");
        assert_eq!(device.state, DeviceState::Shutdown);
    }

    #[test]
    fn test_device_listing_parses_back() {
        let devices = vec![
            test_device_full("iPhone 15", "U1", "17.4", DeviceState::Booted),
            test_device_full("iPad mini", "U2", "17.4", DeviceState::Shutdown),
            test_device_full("iPhone 13", "U3", "16.0", DeviceState::Shutdown),
        ];
        assert_eq!(parse_device_list(&device_listing(&devices)), devices);
    }

    #[tokio::test]
    async fn test_fake_runner_replays_queue_then_repeats_last() {
        let runner = FakeCommandRunner::new();
        runner.respond(&SimctlCommand::ListDevices, CommandOutput::ok("first"));
        runner.respond(&SimctlCommand::ListDevices, CommandOutput::ok("second"));
        let inv = SimctlCommand::ListDevices.invocation(&ToolPaths::default());

        assert_eq!(runner.run(&inv).await.unwrap().stdout, "first");
        assert_eq!(runner.run(&inv).await.unwrap().stdout, "second");
        assert_eq!(runner.run(&inv).await.unwrap().stdout, "second");
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_fake_runner_unscripted_is_empty_success() {
        let runner = FakeCommandRunner::new();
        let inv = SimctlCommand::RevealViewer.invocation(&ToolPaths::default());

        let output = runner.run(&inv).await.unwrap();

        assert!(output.success);
        assert!(!output.has_output());
        assert_eq!(runner.call_lines(), vec!["/usr/bin/open -a Simulator"]);
    }
}
