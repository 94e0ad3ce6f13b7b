//! Engine - shared orchestration state for SimHelper frontends
//!
//! The Engine owns the device registry, the message channel and the event
//! broadcaster. Frontends feed it messages and either drain the channel
//! themselves or call [`Engine::run_until`].

use std::sync::Arc;

use simhelper_core::prelude::*;
use simhelper_daemon::{CommandRunner, ToolPaths};
use tokio::sync::{broadcast, mpsc};

use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::state::AppState;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StateSnapshot {
    refresh_count: u64,
    apps_fetch_id: u64,
    is_loading_apps: bool,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            refresh_count: state.refresh_count,
            apps_fetch_id: state.apps_fetch_id,
            is_loading_apps: state.is_loading_apps,
        }
    }
}

/// Central orchestration for SimHelper.
///
/// Holds the TEA state and the plumbing around it:
/// - Message channel (background tasks report here)
/// - Command runner and tool paths shared with background tasks
/// - Event broadcasting for external consumers
pub struct Engine<R> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    runner: Arc<R>,

    tools: Arc<ToolPaths>,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<R> Engine<R>
where
    R: CommandRunner + Send + Sync + 'static,
{
    /// Create an Engine around a command runner.
    ///
    /// Creates the message channel and the event broadcaster (capacity 256
    /// each). Nothing runs until the first message is processed.
    pub fn new(runner: R, tools: ToolPaths) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (event_tx, _) = broadcast::channel(256);

        Self {
            state: AppState::new(),
            msg_tx,
            msg_rx,
            runner: Arc::new(runner),
            tools: Arc::new(tools),
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Get a clone of the message sender.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Emits EngineEvents based on state changes detected by comparing
    /// before/after snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);
        let direct = Self::direct_event(&msg);

        process::process_message(&mut self.state, msg, &self.msg_tx, &self.runner, &self.tools);

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);

        if let Some(event) = direct {
            self.emit(event);
        }
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Process messages as they arrive until `done` holds or a quit is
    /// requested.
    ///
    /// The condition is checked once before waiting, so a state that is
    /// already done returns immediately.
    pub async fn run_until<F>(&mut self, mut done: F) -> Result<()>
    where
        F: FnMut(&AppState) -> bool,
    {
        while !done(&self.state) && !self.should_quit() {
            let msg = self.msg_rx.recv().await.ok_or(Error::ChannelClosed)?;
            self.process_message(msg);
        }
        Ok(())
    }

    /// Events that follow from the message itself rather than a state change
    fn direct_event(msg: &Message) -> Option<EngineEvent> {
        match msg {
            Message::DeviceRefreshFailed { error } => Some(EngineEvent::DevicesRefreshFailed {
                error: error.clone(),
            }),
            Message::ActionFinished { kind, udid } => Some(EngineEvent::ActionFinished {
                kind: *kind,
                udid: udid.clone(),
            }),
            _ => None,
        }
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre == post {
            return;
        }

        if post.refresh_count != pre.refresh_count {
            self.emit(EngineEvent::DevicesChanged {
                count: self.state.devices.len(),
            });
        }

        let udid = self.state.apps_udid.clone().unwrap_or_default();

        // New fetch started
        if post.apps_fetch_id != pre.apps_fetch_id {
            self.emit(EngineEvent::AppsLoading { udid: udid.clone() });
        }

        // Current fetch settled
        if pre.is_loading_apps && !post.is_loading_apps {
            match &self.state.app_fetch_error {
                Some(error) => self.emit(EngineEvent::AppsFetchFailed {
                    udid,
                    error: error.clone(),
                }),
                None => self.emit(EngineEvent::AppsLoaded {
                    udid,
                    count: self.state.installed_apps.len(),
                }),
            }
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() returns Err only if there are no receivers, which is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
