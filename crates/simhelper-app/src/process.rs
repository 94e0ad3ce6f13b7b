//! Message processing through the TEA update loop

use std::sync::Arc;

use simhelper_daemon::{CommandRunner, ToolPaths};
use tokio::sync::mpsc;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
///
/// Follow-up messages are handled immediately; actions are spawned as
/// background tasks that report back on `msg_tx`.
pub fn process_message<R>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    runner: &Arc<R>,
    tools: &Arc<ToolPaths>,
) where
    R: CommandRunner + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), runner.clone(), tools.clone());
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
