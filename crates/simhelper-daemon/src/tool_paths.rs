//! Locations of the external tools SimHelper shells out to

/// Paths and names of the external programs
///
/// Defaults match a stock macOS install with Xcode. Nothing here is read from
/// the environment; callers override fields explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// `xcrun` binary, used as `xcrun simctl ...`
    pub xcrun: String,

    /// `open` binary, used to bring the viewer app forward
    pub open: String,

    /// Shell used for piped commands (`<shell> -c <script>`)
    pub shell: String,

    /// Property-list converter used in the app listing pipeline
    pub plutil: String,

    /// Application name passed to `open -a`
    pub viewer_app: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            xcrun: "/usr/bin/xcrun".to_string(),
            open: "/usr/bin/open".to_string(),
            shell: "/bin/sh".to_string(),
            plutil: "plutil".to_string(),
            viewer_app: "Simulator".to_string(),
        }
    }
}
