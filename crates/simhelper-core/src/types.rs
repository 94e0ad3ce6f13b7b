//! Simulator and installed-app records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a simulator as reported by `simctl list devices`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceState {
    Booted,
    Shutdown,
}

impl DeviceState {
    /// Parse the exact token printed by simctl
    ///
    /// Only `Booted` and `Shutdown` are accepted; anything else is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Booted" => Some(DeviceState::Booted),
            "Shutdown" => Some(DeviceState::Shutdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Booted => "Booted",
            DeviceState::Shutdown => "Shutdown",
        }
    }

    pub fn is_booted(&self) -> bool {
        matches!(self, DeviceState::Booted)
    }

    /// Short status label for display ("Running" / "Stopped")
    pub fn label(&self) -> &'static str {
        match self {
            DeviceState::Booted => "Running",
            DeviceState::Shutdown => "Stopped",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device family, inferred from the device name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "iPhone")]
    IPhone,
    #[serde(rename = "iPad")]
    IPad,
    Other,
}

impl DeviceType {
    /// Infer the family from a device name (case-insensitive)
    ///
    /// "ipad" is checked before "iphone".
    pub fn infer(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("ipad") {
            DeviceType::IPad
        } else if lower.contains("iphone") {
            DeviceType::IPhone
        } else {
            DeviceType::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::IPhone => "iPhone",
            DeviceType::IPad => "iPad",
            DeviceType::Other => "Other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulator entry
///
/// `id` is assigned locally on every parse; `udid` is the external key used
/// in all simctl commands. Records are never mutated in place, a refresh
/// produces a fresh set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    /// OS version from the enclosing section header, e.g. "17.4"
    pub version: String,
    pub state: DeviceState,
    pub udid: String,
    pub device_type: DeviceType,
}

impl Device {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        state: DeviceState,
        udid: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let device_type = DeviceType::infer(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            version: version.into(),
            state,
            udid: udid.into(),
            device_type,
        }
    }

    pub fn is_booted(&self) -> bool {
        self.state.is_booted()
    }
}

/// Equality compares what simctl reported; the local `id` is ignored.
impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.state == other.state
            && self.udid == other.udid
            && self.device_type == other.device_type
    }
}

impl Eq for Device {}

/// An application installed on a simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledApp {
    pub id: Uuid,
    pub bundle_id: String,
    pub name: String,
}

impl InstalledApp {
    /// Create a record, falling back to the bundle id when no display name is known
    pub fn new(bundle_id: impl Into<String>, display_name: Option<String>) -> Self {
        let bundle_id = bundle_id.into();
        let name = display_name.unwrap_or_else(|| bundle_id.clone());
        Self {
            id: Uuid::new_v4(),
            bundle_id,
            name,
        }
    }
}

impl PartialEq for InstalledApp {
    fn eq(&self, other: &Self) -> bool {
        self.bundle_id == other.bundle_id && self.name == other.name
    }
}

impl Eq for InstalledApp {}

/// Device-type filter with an "All" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(DeviceType),
}

impl TypeFilter {
    pub const ALL_LABEL: &'static str = "All";

    pub fn matches(&self, device: &Device) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(device_type) => device.device_type == *device_type,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => Self::ALL_LABEL,
            TypeFilter::Only(device_type) => device_type.as_str(),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "iphone" => Ok(TypeFilter::Only(DeviceType::IPhone)),
            "ipad" => Ok(TypeFilter::Only(DeviceType::IPad)),
            "other" => Ok(TypeFilter::Only(DeviceType::Other)),
            _ => Err(format!(
                "unknown device type '{}' (expected All, iPhone, iPad or Other)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_state_from_token_is_exact() {
        assert_eq!(DeviceState::from_token("Booted"), Some(DeviceState::Booted));
        assert_eq!(
            DeviceState::from_token("Shutdown"),
            Some(DeviceState::Shutdown)
        );
        assert_eq!(DeviceState::from_token("booted"), None);
        assert_eq!(DeviceState::from_token("Booting"), None);
        assert_eq!(DeviceState::from_token(""), None);
    }

    #[test]
    fn test_device_state_labels() {
        assert_eq!(DeviceState::Booted.label(), "Running");
        assert_eq!(DeviceState::Shutdown.label(), "Stopped");
        assert_eq!(DeviceState::Booted.to_string(), "Booted");
    }

    #[test]
    fn test_device_type_inference_is_case_insensitive() {
        assert_eq!(DeviceType::infer("iPhone 15 Pro"), DeviceType::IPhone);
        assert_eq!(DeviceType::infer("IPHONE SE"), DeviceType::IPhone);
        assert_eq!(DeviceType::infer("iPad Air (5th generation)"), DeviceType::IPad);
        assert_eq!(DeviceType::infer("my ipad mini"), DeviceType::IPad);
        assert_eq!(DeviceType::infer("Apple Watch Series 9"), DeviceType::Other);
        assert_eq!(DeviceType::infer("Apple TV 4K"), DeviceType::Other);
    }

    #[test]
    fn test_device_type_ipad_wins_over_iphone() {
        assert_eq!(DeviceType::infer("iPhone-sized iPad"), DeviceType::IPad);
    }

    #[test]
    fn test_device_new_infers_type() {
        let device = Device::new("iPhone 15", "17.4", DeviceState::Booted, "ABCD-1234");
        assert_eq!(device.device_type, DeviceType::IPhone);
        assert!(device.is_booted());
    }

    #[test]
    fn test_device_equality_ignores_local_id() {
        let a = Device::new("iPhone 15", "17.4", DeviceState::Booted, "ABCD-1234");
        let b = Device::new("iPhone 15", "17.4", DeviceState::Booted, "ABCD-1234");
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);

        let c = Device::new("iPhone 15", "17.4", DeviceState::Shutdown, "ABCD-1234");
        assert_ne!(a, c);
    }

    #[test]
    fn test_installed_app_name_falls_back_to_bundle_id() {
        let app = InstalledApp::new("com.example.app", None);
        assert_eq!(app.name, "com.example.app");

        let app = InstalledApp::new("com.apple.mobilesafari", Some("Safari".to_string()));
        assert_eq!(app.name, "Safari");
        assert_eq!(app.bundle_id, "com.apple.mobilesafari");
    }

    #[test]
    fn test_type_filter_matches() {
        let phone = Device::new("iPhone 15", "17.4", DeviceState::Booted, "A");
        let pad = Device::new("iPad Pro", "17.4", DeviceState::Booted, "B");

        assert!(TypeFilter::All.matches(&phone));
        assert!(TypeFilter::All.matches(&pad));
        assert!(TypeFilter::Only(DeviceType::IPad).matches(&pad));
        assert!(!TypeFilter::Only(DeviceType::IPad).matches(&phone));
    }

    #[test]
    fn test_type_filter_from_str() {
        assert_eq!("All".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!(
            "iphone".parse::<TypeFilter>(),
            Ok(TypeFilter::Only(DeviceType::IPhone))
        );
        assert_eq!(
            "iPad".parse::<TypeFilter>(),
            Ok(TypeFilter::Only(DeviceType::IPad))
        );
        assert!("watch".parse::<TypeFilter>().is_err());
    }

    #[test]
    fn test_device_type_serializes_as_label() {
        let json = serde_json::to_string(&DeviceType::IPhone).unwrap();
        assert_eq!(json, "\"iPhone\"");
    }
}
