//! simhelper-app - Device registry and action orchestration for SimHelper
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management. [`AppState`] is the device registry; it is only ever mutated by
//! [`handler::update`] on the task that owns the [`Engine`]. Everything that
//! shells out runs on background tokio tasks and reports back as a
//! [`Message`].

pub mod actions;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod message;
pub mod process;
pub mod state;

// Re-export primary types
pub use actions::{ActionKind, ActionPlan, Step};
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use state::AppState;

// Re-export daemon types for consumers
pub use simhelper_daemon::{CommandRunner, SystemCommandRunner, ToolPaths};
