//! ServerManager backend driven through PowerShell
//!
//! Every call runs one `powershell -NoProfile -Command` script that projects
//! the cmdlet output to a flat object and emits it with `ConvertTo-Json`.
//! The JSON is parsed into loosely-typed `Raw*` records first and then
//! validated into the public types, so a missing field becomes a
//! [`Error::ContractViolation`] instead of a silent default.

use crate::error::{Error, Result};
use crate::feature::{FeatureInfo, FeatureStatus, InstallState};
use crate::operation::{ExitCode, OperationResult};
use serde::Deserialize;

#[cfg(windows)]
use crate::feature::validate_name;
#[cfg(windows)]
use crate::manager::FeatureManager;
#[cfg(windows)]
use std::process::Command;

// =============================================================================
// Raw PowerShell records
// =============================================================================

/// PowerShell emits a bare object for a single result and an array otherwise.
///
/// `Many` is tried first: every raw record field is optional, so `One` would
/// otherwise accept `[]` as a record with nothing set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFeature {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    install_state: Option<String>,
    #[serde(default)]
    sub_features: Option<OneOrMany<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawOperation {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    exit_code: Option<String>,
    #[serde(default)]
    restart_needed: Option<String>,
    #[serde(default)]
    feature_result: Option<OneOrMany<RawFeatureResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFeatureResult {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    success: Option<bool>,
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses `Get-WindowsFeature` output into a status snapshot.
///
/// Features whose state is not `Installed` are dropped.
pub fn parse_status(stdout: &str) -> Result<FeatureStatus> {
    const OP: &str = "list_installed";

    let stdout = stdout.trim();
    if stdout.is_empty() {
        return Ok(FeatureStatus::new());
    }

    let raw: OneOrMany<RawFeature> = serde_json::from_str(stdout)?;
    let mut status = FeatureStatus::new();
    for feature in raw.into_vec() {
        let name = feature.name.ok_or_else(|| Error::missing(OP, "Name"))?;
        let display_name = feature
            .display_name
            .ok_or_else(|| Error::missing(OP, "DisplayName"))?;
        let install_state = InstallState::from(
            feature
                .install_state
                .ok_or_else(|| Error::missing(OP, "InstallState"))?,
        );
        if install_state != InstallState::Installed {
            continue;
        }

        let info = FeatureInfo::new(display_name, install_state).with_sub_features(
            feature
                .sub_features
                .map(OneOrMany::into_vec)
                .unwrap_or_default(),
        );
        status.insert(name, info);
    }

    Ok(status)
}

/// Parses `Install-WindowsFeature` / `Uninstall-WindowsFeature` output.
///
/// An empty `FeatureResult` means the cmdlet had nothing to do; the display
/// name then reads `"<name> (already installed)"` for an install and
/// `"<name> (not installed)"` for a removal.
pub fn parse_operation(operation: &'static str, name: &str, stdout: &str) -> Result<OperationResult> {
    let raw: RawOperation = serde_json::from_str(stdout.trim())?;

    let success = raw.success.ok_or_else(|| Error::missing(operation, "Success"))?;
    let exit_code = raw
        .exit_code
        .map(ExitCode::new)
        .ok_or_else(|| Error::missing(operation, "ExitCode"))?;
    let restart_needed = raw
        .restart_needed
        .map(|r| !r.eq_ignore_ascii_case("No"))
        .unwrap_or(false);

    let results = raw
        .feature_result
        .map(OneOrMany::into_vec)
        .unwrap_or_default();

    let display_name = match results.first() {
        Some(first) => first
            .display_name
            .clone()
            .ok_or_else(|| Error::missing(operation, "FeatureResult.DisplayName"))?,
        None if operation == "remove" => format!("{} (not installed)", name),
        None => format!("{} (already installed)", name),
    };

    let failures: Vec<String> = results
        .iter()
        .filter(|r| r.success == Some(false))
        .filter_map(|r| r.name.clone().or_else(|| r.display_name.clone()))
        .collect();

    Ok(OperationResult {
        success,
        display_name,
        exit_code,
        restart_needed,
        sub_feature_failures: if failures.is_empty() {
            None
        } else {
            Some(failures)
        },
    })
}

// =============================================================================
// Scripts
// =============================================================================

#[cfg_attr(not(windows), allow(dead_code))]
const LIST_INSTALLED_SCRIPT: &str = r#"
Import-Module ServerManager
Get-WindowsFeature | Where-Object { $_.Installed } | ForEach-Object {
    [PSCustomObject]@{
        Name = $_.Name
        DisplayName = $_.DisplayName
        InstallState = $_.InstallState.ToString()
        SubFeatures = @($_.SubFeatures)
    }
} | ConvertTo-Json -Compress -Depth 3
"#;

/// Environment variable carrying the feature name into operation scripts
#[cfg_attr(not(windows), allow(dead_code))]
const NAME_VAR: &str = "WINFEATURE_NAME";

/// The feature name is read from [`NAME_VAR`], never spliced into the script text.
#[cfg_attr(not(windows), allow(dead_code))]
fn operation_script(cmdlet: &str, extra_args: &str) -> String {
    format!(
        r#"
        Import-Module ServerManager
        $r = {} -Name $env:{} {} -WarningAction SilentlyContinue
        [PSCustomObject]@{{
            Success = $r.Success
            ExitCode = $r.ExitCode.ToString()
            RestartNeeded = $r.RestartNeeded.ToString()
            FeatureResult = @($r.FeatureResult | ForEach-Object {{
                [PSCustomObject]@{{
                    Name = $_.Name
                    DisplayName = $_.DisplayName
                    Success = $_.Success
                }}
            }})
        }} | ConvertTo-Json -Compress -Depth 4
        "#,
        cmdlet, NAME_VAR, extra_args
    )
}

#[cfg_attr(not(windows), allow(dead_code))]
fn install_script(recurse: bool) -> String {
    let extra = if recurse { "-IncludeAllSubFeature" } else { "" };
    operation_script("Install-WindowsFeature", extra)
}

#[cfg_attr(not(windows), allow(dead_code))]
fn remove_script() -> String {
    operation_script("Uninstall-WindowsFeature", "")
}

// =============================================================================
// Backend
// =============================================================================

/// [`FeatureManager`] backed by the ServerManager PowerShell module
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerManager;

#[cfg(windows)]
impl ServerManager {
    pub fn new() -> Self {
        ServerManager
    }

    /// Checks that the ServerManager module can be loaded on this host
    pub fn is_available(&self) -> bool {
        let script = "Get-Module -ListAvailable ServerManager | Select-Object -First 1 -ExpandProperty Name";
        match run_powershell(script, None) {
            Ok(out) => out.trim().eq_ignore_ascii_case("ServerManager"),
            Err(e) => {
                tracing::debug!("ServerManager probe failed: {}", e);
                false
            }
        }
    }

    /// Like [`ServerManager::new`] but fails when the module is missing
    pub fn connect() -> Result<Self> {
        let manager = ServerManager;
        if !manager.is_available() {
            return Err(Error::ModuleUnavailable);
        }
        Ok(manager)
    }
}

#[cfg(windows)]
impl FeatureManager for ServerManager {
    fn list_installed(&self) -> Result<FeatureStatus> {
        let stdout = run_powershell(LIST_INSTALLED_SCRIPT, None)?;
        parse_status(&stdout)
    }

    fn install(&self, name: &str, recurse: bool) -> Result<OperationResult> {
        validate_name(name)?;
        let stdout = run_powershell(&install_script(recurse), Some(name))?;
        parse_operation("install", name, &stdout)
    }

    fn remove(&self, name: &str) -> Result<OperationResult> {
        validate_name(name)?;
        let stdout = run_powershell(&remove_script(), Some(name))?;
        parse_operation("remove", name, &stdout)
    }
}

#[cfg(windows)]
fn run_powershell(script: &str, name: Option<&str>) -> Result<String> {
    let mut command = Command::new("powershell");
    command.args(["-NoProfile", "-NonInteractive", "-Command", script]);
    if let Some(name) = name {
        command.env(NAME_VAR, name);
    }

    let output = command
        .output()
        .map_err(|e| Error::PowerShell(format!("Failed to start powershell: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::PowerShell(stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
