//! Feature status snapshot types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Install state reported by ServerManager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstallState {
    Installed,
    Available,
    Removed,
    InstallPending,
    UninstallPending,
    Unknown(String),
}

impl From<&str> for InstallState {
    fn from(state: &str) -> Self {
        match state {
            "Installed" => InstallState::Installed,
            "Available" => InstallState::Available,
            "Removed" => InstallState::Removed,
            "InstallPending" => InstallState::InstallPending,
            "UninstallPending" => InstallState::UninstallPending,
            s => InstallState::Unknown(s.to_string()),
        }
    }
}

impl From<String> for InstallState {
    fn from(state: String) -> Self {
        InstallState::from(state.as_str())
    }
}

impl From<InstallState> for String {
    fn from(state: InstallState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallState::Installed => write!(f, "Installed"),
            InstallState::Available => write!(f, "Available"),
            InstallState::Removed => write!(f, "Removed"),
            InstallState::InstallPending => write!(f, "InstallPending"),
            InstallState::UninstallPending => write!(f, "UninstallPending"),
            InstallState::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Metadata for a single feature in a status snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub display_name: String,
    pub install_state: InstallState,
    #[serde(default)]
    pub sub_features: Vec<String>,
}

impl FeatureInfo {
    pub fn new(display_name: impl Into<String>, install_state: InstallState) -> Self {
        FeatureInfo {
            display_name: display_name.into(),
            install_state,
            sub_features: Vec::new(),
        }
    }

    pub fn with_sub_features<I, S>(mut self, sub_features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_features = sub_features.into_iter().map(Into::into).collect();
        self
    }
}

/// Snapshot of installed features, keyed by short feature name (e.g. `Web-Server`).
///
/// A snapshot is taken fresh on every read and is never updated in place.
pub type FeatureStatus = BTreeMap<String, FeatureInfo>;

/// Characters PowerShell treats as a single quote
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Checks that `name` is usable as a feature identifier.
///
/// Quotes (including the typographic ones PowerShell accepts as quotes) and
/// control characters are rejected along with empty names.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name must not be empty")
    } else if name.contains(&SINGLE_QUOTES[..]) {
        Some("name must not contain quotes")
    } else if name.chars().any(char::is_control) {
        Some("name must not contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_state_from_str() {
        assert_eq!(InstallState::from("Installed"), InstallState::Installed);
        assert_eq!(
            InstallState::from("UninstallPending"),
            InstallState::UninstallPending
        );
        assert_eq!(
            InstallState::from("Weird"),
            InstallState::Unknown("Weird".to_string())
        );
    }

    #[test]
    fn test_install_state_serializes_as_string() {
        let info = FeatureInfo::new("Web Server (IIS)", InstallState::Installed);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["install_state"], "Installed");
        assert_eq!(json["display_name"], "Web Server (IIS)");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Web-Server").is_ok());
        assert!(validate_name("RSAT-AD-Tools").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Web'; Remove-Item C:\\ -Recurse; '").is_err());
        assert!(validate_name("Web\nServer").is_err());
    }

    #[test]
    fn test_validate_name_rejects_typographic_quotes() {
        for quote in ['\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'] {
            let name = format!("Web{}; Stop-Computer -Force; {}", quote, quote);
            assert!(
                matches!(validate_name(&name), Err(Error::InvalidName { .. })),
                "{:?} should be rejected",
                name
            );
        }
    }
}
