//! Headless mode runner - one subcommand against the engine
//!
//! Each command feeds messages to the [`Engine`], waits for the background
//! work it started to settle, then prints from the registry.

use std::fmt::Display;
use std::io::{self, Write};
use std::process::ExitCode;

use simhelper_app::{message::Message, Engine};
use simhelper_core::prelude::*;
use simhelper_core::{Device, InstalledApp};
use simhelper_daemon::{CommandRunner, SystemCommandRunner};

use super::HeadlessEvent;
use crate::cli::{Args, Command};

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Result and error streams for a command
pub struct Output<O, E> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Output<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.out, "{}", text).context("Failed to write command output")
    }

    fn event(&mut self, event: HeadlessEvent) {
        event.emit_to(&mut self.out);
    }

    /// Report a failure and produce the failing outcome
    fn failure(&mut self, message: &str, json: bool) -> Result<Outcome> {
        if json {
            self.event(HeadlessEvent::error(message));
        } else {
            writeln!(self.err, "error: {}", message)?;
        }
        Ok(Outcome::Failure)
    }
}

/// Run the parsed command against the real simulator tooling
pub async fn run(args: Args) -> Result<Outcome> {
    info!("SimHelper starting: {:?}", args.command);

    let mut engine = Engine::new(SystemCommandRunner, args.tools.resolve());
    let mut output = Output::new(io::stdout(), io::stderr());

    let outcome = run_command(&mut engine, &args.command, &mut output).await;

    info!("SimHelper exiting");
    outcome
}

/// Run one command against an engine, writing results to `output`
pub async fn run_command<R, O, E>(
    engine: &mut Engine<R>,
    command: &Command,
    output: &mut Output<O, E>,
) -> Result<Outcome>
where
    R: CommandRunner + Send + Sync + 'static,
    O: Write,
    E: Write,
{
    match command {
        Command::List { filter, json } => {
            if let Some(error) = refresh(engine).await? {
                return output.failure(&error, *json);
            }
            engine.process_message(Message::SetTypeFilter(*filter));
            print_devices(engine, output, *json)?;
        }

        Command::Types => {
            if let Some(error) = refresh(engine).await? {
                return output.failure(&error, false);
            }
            for filter in engine.state.available_types() {
                output.line(filter)?;
            }
        }

        Command::Boot { udid } => {
            return device_action(engine, udid, output, |device| Message::BootDevice {
                device,
            })
            .await;
        }

        Command::Shutdown { udid } => {
            return device_action(engine, udid, output, |device| Message::ShutdownDevice {
                device,
            })
            .await;
        }

        Command::Apps { udid, json } => {
            return list_apps(engine, udid, output, *json).await;
        }

        Command::Launch { udid, bundle_id } => {
            let device = match resolve(engine, udid).await? {
                Ok(device) => device,
                Err(error) => return output.failure(&error, false),
            };

            engine.process_message(Message::LaunchApp {
                app: InstalledApp::new(bundle_id.as_str(), None),
                device: device.clone(),
            });
            engine.run_until(|s| s.pending_actions == 0).await?;

            output.line(format!("Launched {} on {}", bundle_id, device.name))?;
        }
    }

    Ok(Outcome::Success)
}

/// Refresh the registry and wait for the listing to land
///
/// Returns the listing error when the tool could not be run.
async fn refresh<R>(engine: &mut Engine<R>) -> Result<Option<String>>
where
    R: CommandRunner + Send + Sync + 'static,
{
    let before = engine.state.refresh_count;

    engine.process_message(Message::RefreshDevices);
    engine
        .run_until(|s| s.refresh_count > before || s.last_refresh_error.is_some())
        .await?;

    Ok(engine.state.last_refresh_error.clone())
}

/// Refresh, then look a device up by UDID
///
/// The inner error is the user-facing message.
async fn resolve<R>(
    engine: &mut Engine<R>,
    udid: &str,
) -> Result<std::result::Result<Device, String>>
where
    R: CommandRunner + Send + Sync + 'static,
{
    if let Some(error) = refresh(engine).await? {
        return Ok(Err(error));
    }
    Ok(engine
        .state
        .find_device(udid)
        .cloned()
        .ok_or_else(|| Error::device_not_found(udid).to_string()))
}

async fn device_action<R, O, E, F>(
    engine: &mut Engine<R>,
    udid: &str,
    output: &mut Output<O, E>,
    to_message: F,
) -> Result<Outcome>
where
    R: CommandRunner + Send + Sync + 'static,
    O: Write,
    E: Write,
    F: FnOnce(Device) -> Message,
{
    let device = match resolve(engine, udid).await? {
        Ok(device) => device,
        Err(error) => return output.failure(&error, false),
    };

    engine.process_message(Message::SelectDevice(device.clone()));
    engine.process_message(to_message(device));
    engine.run_until(|s| s.pending_actions == 0).await?;

    match engine.state.resolve_selected() {
        Some(device) => output.line(format!(
            "{} ({}) is {}",
            device.name,
            device.udid,
            device.state.label()
        ))?,
        None => output.line(format!("{} is no longer listed", udid))?,
    }

    Ok(Outcome::Success)
}

async fn list_apps<R, O, E>(
    engine: &mut Engine<R>,
    udid: &str,
    output: &mut Output<O, E>,
    json: bool,
) -> Result<Outcome>
where
    R: CommandRunner + Send + Sync + 'static,
    O: Write,
    E: Write,
{
    let device = match resolve(engine, udid).await? {
        Ok(device) => device,
        Err(error) => return output.failure(&error, json),
    };

    engine.process_message(Message::FetchInstalledApps { device });
    engine.run_until(|s| !s.is_loading_apps).await?;

    if let Some(error) = &engine.state.app_fetch_error {
        return output.failure(error, json);
    }

    let apps = &engine.state.installed_apps;
    if json {
        for app in apps {
            output.event(HeadlessEvent::app(udid, app));
        }
    } else if apps.is_empty() {
        output.line("No apps installed")?;
    } else {
        for app in apps {
            output.line(format!("{} ({})", app.name, app.bundle_id))?;
        }
    }

    Ok(Outcome::Success)
}

fn print_devices<R, O, E>(engine: &Engine<R>, output: &mut Output<O, E>, json: bool) -> Result<()>
where
    R: CommandRunner + Send + Sync + 'static,
    O: Write,
    E: Write,
{
    let groups = engine.state.grouped_by_version();

    if json {
        for device in groups.iter().flat_map(|(_, devices)| devices) {
            output.event(HeadlessEvent::device(device));
        }
        return Ok(());
    }

    if groups.is_empty() {
        return output.line("No devices");
    }

    for (version, devices) in groups {
        output.line(format!("-- iOS {} --", version))?;
        for device in devices {
            output.line(format!(
                "    {} ({}) ({})",
                device.name,
                device.udid,
                device.state.label()
            ))?;
        }
    }
    Ok(())
}
