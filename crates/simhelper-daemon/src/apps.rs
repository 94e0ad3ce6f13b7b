//! Installed-app discovery using `simctl listapps`
//!
//! `listapps` prints an old-style property list; the pipeline converts it to
//! JSON with `plutil`, giving an object keyed by bundle identifier:
//!
//! ```json
//! {
//!   "com.apple.mobilesafari": { "CFBundleDisplayName": "Safari", ... },
//!   "com.example.app": { "ApplicationType": "User" }
//! }
//! ```

use serde_json::Value;
use simhelper_core::prelude::*;
use simhelper_core::InstalledApp;

use crate::commands::SimctlCommand;
use crate::runner::CommandRunner;
use crate::tool_paths::ToolPaths;

/// Metadata key holding the user-visible app name
const DISPLAY_NAME_KEY: &str = "CFBundleDisplayName";

/// Fetch, parse and sort the apps installed on a simulator
///
/// Unlike the other simctl calls, empty stdout is a failure here: the
/// pipeline always prints at least `{}` when it works. Whitespace-only
/// stdout is not empty and goes to the parser.
pub async fn fetch_installed_apps<R: CommandRunner>(
    runner: &R,
    tools: &ToolPaths,
    udid: &str,
) -> Result<Vec<InstalledApp>> {
    let invocation = SimctlCommand::ListApps {
        udid: udid.to_string(),
    }
    .invocation(tools);

    let output = runner.run(&invocation).await?;

    if !output.has_output() {
        return Err(Error::empty_output(invocation.to_string(), output.stderr));
    }

    let mut apps = parse_app_list(&output.stdout)?;
    sort_apps(&mut apps);

    info!("Found {} app(s) on {}", apps.len(), udid);
    Ok(apps)
}

/// Parse the JSON object produced by `listapps | plutil -convert json`
///
/// Apps are returned in key order. A missing or non-string display name
/// falls back to the bundle identifier. Anything other than a JSON object is
/// a parse error carrying the raw input.
pub fn parse_app_list(raw: &str) -> Result<Vec<InstalledApp>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::parse(format!("app list: {}", e), raw))?;

    let Value::Object(entries) = value else {
        return Err(Error::parse("app list: expected a JSON object", raw));
    };

    Ok(entries
        .into_iter()
        .map(|(bundle_id, info)| {
            let display_name = info
                .get(DISPLAY_NAME_KEY)
                .and_then(Value::as_str)
                .map(str::to_string);
            InstalledApp::new(bundle_id, display_name)
        })
        .collect())
}

/// Sort by display name, ascending and case-sensitive
///
/// The sort is stable, so equal names keep their parsed order.
pub fn sort_apps(apps: &mut [InstalledApp]) {
    apps.sort_by(|a, b| a.name.cmp(&b.name));
}
