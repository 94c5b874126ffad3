//! Integration tests for the state runner

use std::cell::RefCell;

use featurestate::{run, Config, Summary};
use winfeature::{
    ExecutionContext, ExitCode, FeatureInfo, FeatureManager, FeatureStatus, InstallState,
    OperationResult, Result,
};

/// Installs and removes anything except names listed in `broken`
struct FakeHost {
    status: RefCell<FeatureStatus>,
    broken: Vec<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl FakeHost {
    fn new(installed: &[&str]) -> Self {
        FakeHost {
            status: RefCell::new(
                installed
                    .iter()
                    .map(|n| {
                        (
                            n.to_string(),
                            FeatureInfo::new(*n, InstallState::Installed),
                        )
                    })
                    .collect(),
            ),
            broken: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn result(&self, name: &str) -> OperationResult {
        let success = !self.broken.contains(&name);
        OperationResult {
            success,
            display_name: name.to_string(),
            exit_code: ExitCode::new(if success { "Success" } else { "Failed" }),
            restart_needed: false,
            sub_feature_failures: None,
        }
    }
}

impl FeatureManager for FakeHost {
    fn list_installed(&self) -> Result<FeatureStatus> {
        Ok(self.status.borrow().clone())
    }

    fn install(&self, name: &str, recurse: bool) -> Result<OperationResult> {
        self.calls
            .borrow_mut()
            .push(format!("install {} recurse={}", name, recurse));
        let result = self.result(name);
        if result.success {
            self.status.borrow_mut().insert(
                name.to_string(),
                FeatureInfo::new(name, InstallState::Installed),
            );
        }
        Ok(result)
    }

    fn remove(&self, name: &str) -> Result<OperationResult> {
        self.calls.borrow_mut().push(format!("remove {}", name));
        let result = self.result(name);
        if result.success {
            self.status.borrow_mut().remove(name);
        }
        Ok(result)
    }
}

fn document() -> Config {
    Config::parse(
        r#"
        [[feature]]
        id = "webserver"
        name = "Web-Server"
        ensure = "installed"
        recurse = true

        [[feature]]
        name = "Telnet-Client"
        ensure = "removed"

        [[feature]]
        name = "SNMP-Service"
        ensure = "installed"

        [[feature]]
        name = "Fax"
        ensure = "removed"
        "#,
    )
    .unwrap()
}

#[test]
fn test_run_applies_states_in_order() {
    let host = FakeHost::new(&["Telnet-Client", "SNMP-Service"]);
    let config = document();

    let outcomes = run(&host, &ExecutionContext::default(), &config.features);

    let ids: Vec<&str> = outcomes.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["webserver", "Telnet-Client", "SNMP-Service", "Fax"]);
    assert_eq!(
        *host.calls.borrow(),
        vec![
            "install Web-Server recurse=true".to_string(),
            "remove Telnet-Client".to_string(),
        ]
    );

    let summary = Summary::from_outcomes(&outcomes);
    assert_eq!(
        summary,
        Summary {
            succeeded: 4,
            failed: 0,
            changed: 2,
            pending: 0
        }
    );
}

#[test]
fn test_run_dry_run_changes_nothing() {
    let host = FakeHost::new(&["Telnet-Client"]);
    let config = document();

    let outcomes = run(&host, &ExecutionContext::dry_run(), &config.features);

    assert!(host.calls.borrow().is_empty());
    let summary = Summary::from_outcomes(&outcomes);
    assert_eq!(summary.pending, 3);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.changed, 0);
}

#[test]
fn test_run_continues_after_failure() {
    let mut host = FakeHost::new(&["Telnet-Client"]);
    host.broken = vec!["Web-Server"];
    let config = document();

    let outcomes = run(&host, &ExecutionContext::default(), &config.features);

    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[0].report.result, Some(false));
    assert_eq!(
        outcomes[0].report.comment,
        "Failed to install Web-Server: Failed"
    );
    assert_eq!(outcomes[1].report.result, Some(true));
    assert!(Summary::from_outcomes(&outcomes).has_failures());
}

#[test]
fn test_reports_serialize_as_array() {
    let host = FakeHost::new(&[]);
    let config = document();

    let outcomes = run(&host, &ExecutionContext::dry_run(), &config.features);
    let json = serde_json::to_value(&outcomes).unwrap();

    let first = &json[0];
    assert_eq!(first["id"], "webserver");
    assert_eq!(first["name"], "Web-Server");
    assert!(first["result"].is_null());
    assert_eq!(first["comment"], "Web-Server will be installed recurse=true");
}
