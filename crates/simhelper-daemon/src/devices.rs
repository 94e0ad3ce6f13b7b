//! Simulator discovery using `xcrun simctl list devices`
//!
//! The text listing is grouped into sections, one per runtime:
//!
//! ```text
//! == Devices ==
//! -- iOS 17.4 --
//!     iPhone 15 (6A1C9E0B-2F4D-4F0E-9D55-1C2B3A4D5E6F) (Booted)
//!     iPad Air (5th generation) (0F2E...) (Shutdown)
//! -- iOS 16.0 --
//!     ...
//! ```
//!
//! Parsing is line-oriented and total: anything that is neither an iOS
//! section header nor a well-formed device line is skipped.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use simhelper_core::prelude::*;
use simhelper_core::{compare_versions, Device, DeviceState, DeviceType, TypeFilter};

use crate::commands::SimctlCommand;
use crate::runner::CommandRunner;
use crate::tool_paths::ToolPaths;

/// Marker that opens an iOS section header
const HEADER_MARKER: &str = "-- iOS ";

/// Marker that closes a section header
const HEADER_END: &str = " --";

/// `<name> (<udid>) (<Booted|Shutdown>)`
static DEVICE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) \(([\w-]+)\) \((Booted|Shutdown)\)$").expect("Invalid device line regex")
});

/// Run `simctl list devices` and parse the result
///
/// Any exit status is accepted; whatever reached stdout is parsed. Only a
/// failure to start the tool is an error.
pub async fn list_devices<R: CommandRunner>(
    runner: &R,
    tools: &ToolPaths,
) -> Result<Vec<Device>> {
    let invocation = SimctlCommand::ListDevices.invocation(tools);
    let output = runner.run(&invocation).await?;

    if !output.success {
        warn!(
            "'{}' exited with {:?}: {}",
            invocation,
            output.exit_code,
            output.stderr.trim()
        );
    }

    let devices = parse_device_list(&output.stdout);
    info!("Found {} simulator(s)", devices.len());
    Ok(devices)
}

/// Parse the text output of `simctl list devices`
///
/// Devices are returned in file order. A device line seen before any header
/// gets an empty version.
pub fn parse_device_list(output: &str) -> Vec<Device> {
    let mut current_version = String::new();
    let mut devices = Vec::new();

    for line in output.lines() {
        if let Some(version) = parse_header(line) {
            current_version = version;
            continue;
        }

        if let Some(device) = parse_device_line(line, &current_version) {
            devices.push(device);
        }
    }

    devices
}

/// Extract the version from an iOS section header
fn parse_header(line: &str) -> Option<String> {
    let (_, rest) = line.rsplit_once(HEADER_MARKER)?;
    let version = rest.split(HEADER_END).next().unwrap_or(rest);
    Some(version.trim().to_string())
}

fn parse_device_line(line: &str, version: &str) -> Option<Device> {
    let caps = DEVICE_LINE.captures(line.trim())?;
    let name = caps.get(1)?.as_str();
    let udid = caps.get(2)?.as_str();
    let state = DeviceState::from_token(caps.get(3)?.as_str())?;
    Some(Device::new(name, version, state, udid))
}

/// Devices matching the filter, in their original order
pub fn filter_by_type(devices: &[Device], filter: TypeFilter) -> Vec<&Device> {
    devices.iter().filter(|d| filter.matches(d)).collect()
}

/// Group devices by OS version, newest version first
///
/// Versions compare numerically ("17.4" before "16.0" before "9.0"). Devices
/// keep their original order within a group.
pub fn group_by_version<'a, I>(devices: I) -> Vec<(&'a str, Vec<&'a Device>)>
where
    I: IntoIterator<Item = &'a Device>,
{
    let mut groups: Vec<(&'a str, Vec<&'a Device>)> = Vec::new();

    for device in devices {
        match groups.iter_mut().find(|(v, _)| *v == device.version) {
            Some((_, members)) => members.push(device),
            None => groups.push((device.version.as_str(), vec![device])),
        }
    }

    groups.sort_by(|a, b| compare_versions(b.0, a.0));
    groups
}

/// "All" followed by the distinct device types present, alphabetically
pub fn available_types(devices: &[Device]) -> Vec<TypeFilter> {
    let mut types: Vec<DeviceType> = devices
        .iter()
        .map(|d| d.device_type)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    types.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    std::iter::once(TypeFilter::All)
        .chain(types.into_iter().map(TypeFilter::Only))
        .collect()
}

/// Look up a device by UDID
pub fn find_device<'a>(devices: &'a [Device], udid: &str) -> Option<&'a Device> {
    devices.iter().find(|d| d.udid == udid)
}
