//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simhelper_core::logging::DEFAULT_DIRECTIVE;
use simhelper_core::{LogConfig, TypeFilter};
use simhelper_daemon::ToolPaths;

/// SimHelper - manage iOS simulators from the command line
#[derive(Parser, Debug)]
#[command(name = "simhelper")]
#[command(about = "Manage iOS simulators from the command line", long_about = None)]
pub struct Args {
    /// Tracing filter directive, e.g. "simhelper=debug"
    #[arg(long, global = true, value_name = "DIRECTIVE", default_value = DEFAULT_DIRECTIVE)]
    pub log_level: String,

    /// Write logs to daily files in this directory instead of stderr
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    pub tools: ToolArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            directive: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

/// Overrides for the external programs
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ToolArgs {
    /// Path to xcrun
    #[arg(long, global = true, value_name = "PATH")]
    pub xcrun: Option<String>,

    /// Path to open
    #[arg(long, global = true, value_name = "PATH")]
    pub open: Option<String>,

    /// Shell used for the listapps pipeline
    #[arg(long, global = true, value_name = "PATH")]
    pub shell: Option<String>,

    /// Path to plutil
    #[arg(long, global = true, value_name = "PATH")]
    pub plutil: Option<String>,

    /// Application brought forward after boot and launch
    #[arg(long, global = true, value_name = "NAME")]
    pub viewer_app: Option<String>,
}

impl ToolArgs {
    /// Default tool paths with any overrides applied
    pub fn resolve(&self) -> ToolPaths {
        let mut tools = ToolPaths::default();
        let overrides = [
            (&mut tools.xcrun, &self.xcrun),
            (&mut tools.open, &self.open),
            (&mut tools.shell, &self.shell),
            (&mut tools.plutil, &self.plutil),
            (&mut tools.viewer_app, &self.viewer_app),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        tools
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List devices grouped by OS version, newest first
    List {
        /// Only show one kind of device (All, iPhone, iPad, Other)
        #[arg(long = "type", value_name = "TYPE", default_value = TypeFilter::ALL_LABEL)]
        filter: TypeFilter,

        /// Print NDJSON events instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the device-type filters that apply to the current devices
    Types,

    /// Boot a device and bring the Simulator forward
    Boot { udid: String },

    /// Shut a device down
    Shutdown { udid: String },

    /// List the apps installed on a device, sorted by name
    Apps {
        udid: String,

        /// Print NDJSON events instead of text
        #[arg(long)]
        json: bool,
    },

    /// Launch an installed app and bring the Simulator forward
    Launch { udid: String, bundle_id: String },
}
