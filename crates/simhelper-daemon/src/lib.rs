//! # simhelper-daemon - simctl Process Management
//!
//! Runs the external device-management tools (`xcrun simctl`, `open`,
//! `plutil`) and turns their output into [`simhelper_core`] records.
//!
//! ## Public API
//!
//! ### Command Execution
//! - [`CommandRunner`] - Async seam for running external programs
//! - [`SystemCommandRunner`] - `tokio::process` implementation
//! - [`Invocation`], [`CommandOutput`] - What to run and what came back
//!
//! ### Command Catalogue
//! - [`SimctlCommand`] - Every invocation SimHelper issues
//! - [`ToolPaths`] - Paths of the external programs
//!
//! ### Parsing
//! - [`parse_device_list()`] - Text output of `simctl list devices`
//! - [`parse_app_list()`] - JSON output of `simctl listapps | plutil`
//!
//! ### Workflows
//! - [`list_devices()`], [`fetch_installed_apps()`]

pub mod apps;
pub mod commands;
pub mod devices;
pub mod runner;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod tool_paths;

pub use apps::{fetch_installed_apps, parse_app_list, sort_apps};
pub use commands::{shell_quote, SimctlCommand};
pub use devices::{
    available_types, filter_by_type, find_device, group_by_version, list_devices,
    parse_device_list,
};
pub use runner::{CommandOutput, CommandRunner, Invocation, LocalCommandRunner, SystemCommandRunner};
pub use tool_paths::ToolPaths;
