//! Headless mode - command execution with text or JSON output
//!
//! Every subcommand runs against an [`simhelper_app::Engine`] and prints its
//! result once the engine has settled. With `--json`, results are written as
//! NDJSON (newline-delimited JSON), one event per line. Each event has an
//! "event" field indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"device","udid":"5A1B...","name":"iPhone 15","version":"17.4","state":"Booted","device_type":"iPhone","timestamp":1704700001000}
//! {"event":"app","udid":"5A1B...","bundle_id":"com.apple.mobilesafari","name":"Safari","timestamp":1704700002000}
//! {"event":"error","message":"Failed to fetch apps.\n...","timestamp":1704700003000}
//! ```

pub mod runner;

use std::io::Write;

use chrono::Utc;
use serde::Serialize;
use simhelper_core::{Device, InstalledApp};
use tracing::error;

/// Events emitted in JSON mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// One device from the registry
    Device {
        udid: String,
        name: String,
        version: String,
        state: String,
        device_type: String,
        timestamp: i64,
    },

    /// One installed app
    App {
        udid: String,
        bundle_id: String,
        name: String,
        timestamp: i64,
    },

    /// The command failed
    Error { message: String, timestamp: i64 },
}

impl HeadlessEvent {
    /// Write this event as one NDJSON line
    pub fn emit_to<W: Write>(&self, out: &mut W) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(out, "{}", json) {
            error!("Failed to write headless event: {}", e);
            return;
        }

        if let Err(e) = out.flush() {
            error!("Failed to flush headless output: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn device(device: &Device) -> Self {
        Self::Device {
            udid: device.udid.clone(),
            name: device.name.clone(),
            version: device.version.clone(),
            state: device.state.as_str().to_string(),
            device_type: device.device_type.as_str().to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn app(udid: &str, app: &InstalledApp) -> Self {
        Self::App {
            udid: udid.to_string(),
            bundle_id: app.bundle_id.clone(),
            name: app.name.clone(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            timestamp: Self::now(),
        }
    }
}
