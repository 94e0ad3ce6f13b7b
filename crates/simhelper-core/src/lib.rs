//! # simhelper-core - Core Domain Types
//!
//! Foundation crate for SimHelper. Provides the simulator and installed-app
//! records, version ordering, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing, uuid).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Device`] - One simulator entry from `simctl list devices`
//! - [`DeviceState`] - Lifecycle state (`Booted` | `Shutdown`)
//! - [`DeviceType`] - Device family inferred from the name
//! - [`TypeFilter`] - "All" sentinel or a single device family
//! - [`InstalledApp`] - One application installed on a simulator
//!
//! ### Versions (`version`)
//! - [`compare_versions()`] - Numeric-aware ordering of OS version strings
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum covering launch, empty-output and parse failures
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use simhelper_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod types;
pub mod version;

/// Prelude for common imports used throughout all SimHelper crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use logging::LogConfig;
pub use types::{Device, DeviceState, DeviceType, InstalledApp, TypeFilter};
pub use version::compare_versions;
