//! `installed` / `removed` convergence states
//!
//! Each call reads the installed features, decides whether the desired state
//! already holds, and if not (and not a dry run) makes exactly one install or
//! remove call, then reads again and reports the difference. Collaborator
//! errors are folded into the report; nothing is returned as `Err`.

use crate::compare::compare;
use crate::error::Error;
use crate::feature::{validate_name, FeatureStatus};
use crate::manager::{ExecutionContext, FeatureManager};
use crate::operation::OperationResult;
use crate::report::{ConvergenceReport, ReportBuilder};
use tracing::{debug, error, info, warn};

/// Ensures feature `name` is installed.
///
/// `recurse` also installs all sub-features. `force` reruns the install when
/// the feature is already present so missing sub-features get picked up; it
/// only has an effect together with `recurse`.
pub fn installed<M>(
    manager: &M,
    ctx: &ExecutionContext,
    name: &str,
    recurse: bool,
    force: bool,
) -> ConvergenceReport
where
    M: FeatureManager + ?Sized,
{
    let report = ReportBuilder::new(name);
    if let Err(e) = validate_name(name) {
        warn!(feature = name, "rejected feature name: {}", e);
        return report.failed(e.to_string());
    }

    let before = match manager.list_installed() {
        Ok(status) => status,
        Err(e) => return read_failed(report, name, e),
    };

    let report = if !before.contains_key(name) {
        report.comment(format!("{} will be installed recurse={}", name, recurse))
    } else if force && recurse {
        report.comment(format!(
            "{} already installed but might install sub-features",
            name
        ))
    } else {
        debug!(feature = name, "already installed");
        return report
            .comment(format!("The feature {} is already installed", name))
            .satisfied();
    };

    if ctx.test {
        info!(feature = name, recurse, "test mode, skipping install");
        return report.pending();
    }

    info!(feature = name, recurse, "installing feature");
    let op = match manager.install(name, recurse) {
        Ok(op) => op,
        Err(e) => {
            error!(feature = name, "install failed: {}", e);
            return report.failed(format!("Failed to install {}: {}", name, e));
        }
    };
    log_operation(name, &op);

    let report = if op.success {
        report.comment(done_comment("Installed", name, &op))
    } else {
        report.comment(format!("Failed to install {}: {}", name, op.exit_code))
    };
    finish(manager, report, name, op.success, &before)
}

/// Ensures feature `name` is not installed.
pub fn removed<M>(manager: &M, ctx: &ExecutionContext, name: &str) -> ConvergenceReport
where
    M: FeatureManager + ?Sized,
{
    let report = ReportBuilder::new(name);
    if let Err(e) = validate_name(name) {
        warn!(feature = name, "rejected feature name: {}", e);
        return report.failed(e.to_string());
    }

    let before = match manager.list_installed() {
        Ok(status) => status,
        Err(e) => return read_failed(report, name, e),
    };

    if !before.contains_key(name) {
        debug!(feature = name, "not installed");
        return report
            .comment(format!("The feature {} is not installed", name))
            .satisfied();
    }
    let report = report.comment(format!("{} will be removed", name));

    if ctx.test {
        info!(feature = name, "test mode, skipping removal");
        return report.pending();
    }

    info!(feature = name, "removing feature");
    let op = match manager.remove(name) {
        Ok(op) => op,
        Err(e) => {
            error!(feature = name, "removal failed: {}", e);
            return report.failed(format!("Failed to uninstall the feature {}: {}", name, e));
        }
    };
    log_operation(name, &op);

    let report = if op.success {
        report.comment(done_comment("Removed", name, &op))
    } else {
        report.comment(format!(
            "Failed to uninstall the feature {}: {}",
            name, op.exit_code
        ))
    };
    finish(manager, report, name, op.success, &before)
}

fn finish<M>(
    manager: &M,
    report: ReportBuilder,
    name: &str,
    success: bool,
    before: &FeatureStatus,
) -> ConvergenceReport
where
    M: FeatureManager + ?Sized,
{
    match manager.list_installed() {
        Ok(after) => {
            let changes = compare(before, &after);
            debug!(feature = name, changed = changes.len(), "status re-read");
            report.finish(success, changes)
        }
        Err(e) => {
            error!(feature = name, "failed to re-read installed features: {}", e);
            report.failed(format!(
                "Failed to list installed features after changing {}: {}",
                name, e
            ))
        }
    }
}

fn read_failed(report: ReportBuilder, name: &str, e: Error) -> ConvergenceReport {
    error!(feature = name, "failed to list installed features: {}", e);
    report.failed(format!("Failed to list installed features: {}", e))
}

fn done_comment(verb: &str, name: &str, op: &OperationResult) -> String {
    if op.restart_needed {
        format!("{} {} (restart required)", verb, name)
    } else {
        format!("{} {}", verb, name)
    }
}

fn log_operation(name: &str, op: &OperationResult) {
    if op.no_change_needed() {
        info!(feature = name, display_name = %op.display_name, "installer reported nothing to do");
    } else {
        debug!(
            feature = name,
            success = op.success,
            exit_code = %op.exit_code,
            restart_needed = op.restart_needed,
            "operation finished"
        );
    }
    if let Some(failures) = &op.sub_feature_failures {
        warn!(feature = name, ?failures, "sub-features failed");
    }
}
