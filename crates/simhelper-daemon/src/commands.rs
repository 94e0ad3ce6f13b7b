//! The simctl command catalogue
//!
//! Every external call SimHelper makes is one [`SimctlCommand`]. Turning a
//! command into an [`Invocation`] is pure, so the exact argument vectors can
//! be asserted in tests without spawning anything.

use std::fmt;

use crate::runner::Invocation;
use crate::tool_paths::ToolPaths;

/// External commands issued against the simulator tooling
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimctlCommand {
    /// `xcrun simctl list devices`
    ListDevices,

    /// `xcrun simctl boot <udid>`
    Boot { udid: String },

    /// `xcrun simctl shutdown <udid>`
    Shutdown { udid: String },

    /// `xcrun simctl listapps <udid> | plutil -convert json -o - -`
    ListApps { udid: String },

    /// `xcrun simctl launch <udid> <bundle-id>`
    Launch { udid: String, bundle_id: String },

    /// `open -a Simulator`
    RevealViewer,
}

impl SimctlCommand {
    /// Short name used in logs and messages
    pub fn name(&self) -> &'static str {
        match self {
            SimctlCommand::ListDevices => "list devices",
            SimctlCommand::Boot { .. } => "boot",
            SimctlCommand::Shutdown { .. } => "shutdown",
            SimctlCommand::ListApps { .. } => "listapps",
            SimctlCommand::Launch { .. } => "launch",
            SimctlCommand::RevealViewer => "reveal viewer",
        }
    }

    /// Build the concrete invocation for these tool paths
    pub fn invocation(&self, tools: &ToolPaths) -> Invocation {
        match self {
            SimctlCommand::ListDevices => {
                Invocation::exec(&tools.xcrun, ["simctl", "list", "devices"])
            }
            SimctlCommand::Boot { udid } => {
                Invocation::exec(&tools.xcrun, ["simctl", "boot", udid.as_str()])
            }
            SimctlCommand::Shutdown { udid } => {
                Invocation::exec(&tools.xcrun, ["simctl", "shutdown", udid.as_str()])
            }
            SimctlCommand::ListApps { udid } => Invocation::shell(
                &tools.shell,
                format!(
                    "{} simctl listapps {} | {} -convert json -o - -",
                    shell_quote(&tools.xcrun),
                    shell_quote(udid),
                    shell_quote(&tools.plutil)
                ),
            ),
            SimctlCommand::Launch { udid, bundle_id } => Invocation::exec(
                &tools.xcrun,
                ["simctl", "launch", udid.as_str(), bundle_id.as_str()],
            ),
            SimctlCommand::RevealViewer => {
                Invocation::exec(&tools.open, ["-a", tools.viewer_app.as_str()])
            }
        }
    }
}

impl fmt::Display for SimctlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimctlCommand::Boot { udid }
            | SimctlCommand::Shutdown { udid }
            | SimctlCommand::ListApps { udid } => write!(f, "{} {}", self.name(), udid),
            SimctlCommand::Launch { udid, bundle_id } => {
                write!(f, "{} {} {}", self.name(), udid, bundle_id)
            }
            SimctlCommand::ListDevices | SimctlCommand::RevealViewer => f.write_str(self.name()),
        }
    }
}

/// Quote a word for a POSIX shell
///
/// Words made only of safe characters pass through unchanged; anything else
/// is wrapped in single quotes with embedded quotes escaped.
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':'));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
