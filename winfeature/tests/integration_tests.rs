//! Integration tests against a real Windows Server host.
//!
//! These tests require:
//! - Windows Server with the ServerManager PowerShell module
//! - Administrator privileges
//! - The `integration` feature enabled
//!
//! Run with: cargo test -p winfeature --features integration -- --test-threads=1
//!
//! Only dry-run states are exercised so the host is never modified.

#![cfg(all(windows, feature = "integration"))]

use winfeature::{installed, removed, ExecutionContext, FeatureManager, ServerManager};

const MISSING_FEATURE: &str = "Telnet-Client";

#[test]
fn test_connect() {
    let result = ServerManager::connect();
    assert!(
        result.is_ok(),
        "ServerManager module should be available: {:?}",
        result.err()
    );
}

#[test]
fn test_list_installed() {
    let manager = ServerManager::connect().expect("Failed to connect");
    let status = manager.list_installed().expect("Failed to list features");
    for (name, info) in &status {
        assert!(!name.is_empty(), "Feature name should not be empty");
        println!("{} - {}", name, info.display_name);
    }
}

#[test]
fn test_dry_run_install_makes_no_changes() {
    let manager = ServerManager::connect().expect("Failed to connect");
    let before = manager.list_installed().expect("Failed to list features");

    let report = installed(
        &manager,
        &ExecutionContext::dry_run(),
        MISSING_FEATURE,
        false,
        false,
    );

    if before.contains_key(MISSING_FEATURE) {
        assert_eq!(report.result, Some(true));
    } else {
        assert_eq!(report.result, None);
    }
    assert!(report.changes.is_empty());

    let after = manager.list_installed().expect("Failed to list features");
    assert_eq!(before, after);
}

#[test]
fn test_dry_run_remove_of_missing_feature() {
    let manager = ServerManager::connect().expect("Failed to connect");

    let report = removed(&manager, &ExecutionContext::dry_run(), "No-Such-Feature");

    assert_eq!(report.result, Some(true));
    assert_eq!(report.comment, "The feature No-Such-Feature is not installed");
}
