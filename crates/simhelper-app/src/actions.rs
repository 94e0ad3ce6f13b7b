//! Action handlers: background tasks spawned in response to UpdateAction
//!
//! Device actions are expressed as an [`ActionPlan`], an ordered list of
//! steps. Each step runs to completion before the next starts; failures are
//! logged and never abort the plan.

use std::fmt;
use std::sync::Arc;

use simhelper_core::prelude::*;
use simhelper_daemon::{
    fetch_installed_apps, list_devices, CommandRunner, SimctlCommand, ToolPaths,
};
use tokio::sync::mpsc;

use crate::handler::UpdateAction;
use crate::message::Message;

/// The user-facing action a plan carries out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Boot,
    Shutdown,
    Launch,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Boot => "boot",
            ActionKind::Shutdown => "shutdown",
            ActionKind::Launch => "launch",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of an action plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run an external command and wait for it to exit
    Run(SimctlCommand),
    /// Re-list devices and publish the result
    Refresh,
}

/// An ordered sequence of steps for one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    pub kind: ActionKind,
    pub udid: String,
    pub steps: Vec<Step>,
}

impl ActionPlan {
    /// Boot, bring the viewer forward, refresh
    pub fn boot(udid: impl Into<String>) -> Self {
        let udid = udid.into();
        Self {
            kind: ActionKind::Boot,
            steps: vec![
                Step::Run(SimctlCommand::Boot { udid: udid.clone() }),
                Step::Run(SimctlCommand::RevealViewer),
                Step::Refresh,
            ],
            udid,
        }
    }

    /// Shut down, refresh
    pub fn shutdown(udid: impl Into<String>) -> Self {
        let udid = udid.into();
        Self {
            kind: ActionKind::Shutdown,
            steps: vec![
                Step::Run(SimctlCommand::Shutdown { udid: udid.clone() }),
                Step::Refresh,
            ],
            udid,
        }
    }

    /// Launch an app, bring the viewer forward
    ///
    /// No refresh: launching does not change device state.
    pub fn launch(udid: impl Into<String>, bundle_id: impl Into<String>) -> Self {
        let udid = udid.into();
        Self {
            kind: ActionKind::Launch,
            steps: vec![
                Step::Run(SimctlCommand::Launch {
                    udid: udid.clone(),
                    bundle_id: bundle_id.into(),
                }),
                Step::Run(SimctlCommand::RevealViewer),
            ],
            udid,
        }
    }
}

/// Execute an action by spawning a background task
pub fn handle_action<R>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    runner: Arc<R>,
    tools: Arc<ToolPaths>,
) where
    R: CommandRunner + Send + Sync + 'static,
{
    match action {
        UpdateAction::RefreshDevices => {
            tokio::spawn(async move {
                refresh_devices(runner.as_ref(), &tools, &msg_tx).await;
            });
        }

        UpdateAction::RunPlan(plan) => {
            tokio::spawn(async move {
                execute_plan(plan, runner.as_ref(), &tools, &msg_tx).await;
            });
        }

        UpdateAction::FetchInstalledApps { fetch_id, udid } => {
            tokio::spawn(async move {
                fetch_apps(fetch_id, &udid, runner.as_ref(), &tools, &msg_tx).await;
            });
        }
    }
}

/// Run every step of a plan in order, then report completion
pub async fn execute_plan<R: CommandRunner>(
    plan: ActionPlan,
    runner: &R,
    tools: &ToolPaths,
    msg_tx: &mpsc::Sender<Message>,
) {
    info!("Starting {} on {}", plan.kind, plan.udid);

    for step in &plan.steps {
        match step {
            Step::Run(command) => run_step(command, runner, tools).await,
            Step::Refresh => refresh_devices(runner, tools, msg_tx).await,
        }
    }

    let _ = msg_tx
        .send(Message::ActionFinished {
            kind: plan.kind,
            udid: plan.udid,
        })
        .await;
}

async fn run_step<R: CommandRunner>(command: &SimctlCommand, runner: &R, tools: &ToolPaths) {
    match runner.run(&command.invocation(tools)).await {
        Ok(output) if output.success => {
            debug!("{} completed", command);
        }
        Ok(output) => {
            warn!(
                "{} exited with {:?}: {}",
                command,
                output.exit_code,
                output.stderr.trim()
            );
        }
        Err(e) => {
            warn!("{} could not be started: {}", command, e);
        }
    }
}

/// List devices and publish the outcome
///
/// A failed listing is reported but leaves the registry untouched.
pub async fn refresh_devices<R: CommandRunner>(
    runner: &R,
    tools: &ToolPaths,
    msg_tx: &mpsc::Sender<Message>,
) {
    let msg = match list_devices(runner, tools).await {
        Ok(devices) => Message::DevicesRefreshed { devices },
        Err(e) => {
            error!("Device listing failed: {}", e);
            Message::DeviceRefreshFailed {
                error: e.to_string(),
            }
        }
    };
    let _ = msg_tx.send(msg).await;
}

async fn fetch_apps<R: CommandRunner>(
    fetch_id: u64,
    udid: &str,
    runner: &R,
    tools: &ToolPaths,
    msg_tx: &mpsc::Sender<Message>,
) {
    let msg = match fetch_installed_apps(runner, tools, udid).await {
        Ok(apps) => Message::InstalledAppsFetched { fetch_id, apps },
        Err(e) => {
            warn!("App fetch for {} failed: {}", udid, e);
            Message::InstalledAppsFetchFailed {
                fetch_id,
                error: describe_fetch_error(&e),
            }
        }
    };
    let _ = msg_tx.send(msg).await;
}

/// The user-facing text for a failed app fetch
pub fn describe_fetch_error(error: &Error) -> String {
    match error {
        Error::EmptyOutput { stderr, .. } => format!("Failed to fetch apps.\n{}", stderr),
        Error::Parse { raw, .. } => format!("Failed to parse app list.\nRaw output:\n{}", raw),
        other => format!("Failed to fetch apps.\n{}", other),
    }
}
