//! Results of mutating feature operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Installer exit code, passed through as reported (`Success`, `NoChangeNeeded`, `Failed`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExitCode(String);

impl ExitCode {
    pub fn new(code: impl Into<String>) -> Self {
        ExitCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single install or remove call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub display_name: String,
    pub exit_code: ExitCode,
    #[serde(default)]
    pub restart_needed: bool,
    /// Sub-features the installer reported as failed, if it reported any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_feature_failures: Option<Vec<String>>,
}

impl OperationResult {
    /// True when the installer found nothing to do because the feature was already there
    pub fn already_installed(&self) -> bool {
        self.display_name
            .to_ascii_lowercase()
            .contains("already installed")
    }

    /// True when the installer had nothing to do, for either an install or a removal
    pub fn no_change_needed(&self) -> bool {
        self.exit_code.as_str() == "NoChangeNeeded" || self.already_installed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(display_name: &str) -> OperationResult {
        OperationResult {
            success: true,
            display_name: display_name.to_string(),
            exit_code: ExitCode::new("NoChangeNeeded"),
            restart_needed: false,
            sub_feature_failures: None,
        }
    }

    #[test]
    fn test_already_installed() {
        assert!(result("Web-Server (already installed)").already_installed());
        assert!(result("Feature Already Installed").already_installed());
        assert!(!result("Web Server (IIS)").already_installed());
    }

    #[test]
    fn test_no_change_needed() {
        let mut removal = result("Telnet-Client (not installed)");
        assert!(!removal.already_installed());
        assert!(removal.no_change_needed());

        removal.exit_code = ExitCode::new("Success");
        assert!(!removal.no_change_needed());
        assert!(result("Web-Server (already installed)").no_change_needed());
    }

    #[test]
    fn test_exit_code_is_transparent() {
        let json = serde_json::to_value(result("x")).unwrap();
        assert_eq!(json["exit_code"], "NoChangeNeeded");
        assert!(json.get("sub_feature_failures").is_none());
    }
}
