//! Collaborator interface for reading and changing installed features

use crate::error::Result;
use crate::feature::FeatureStatus;
use crate::operation::OperationResult;

/// Capability set the convergence states need from the host.
///
/// `ServerManager` is the real implementation on Windows; tests substitute an
/// in-memory one.
pub trait FeatureManager {
    /// Returns the currently installed features
    fn list_installed(&self) -> Result<FeatureStatus>;

    /// Installs `name`, including all of its sub-features when `recurse` is set
    fn install(&self, name: &str, recurse: bool) -> Result<OperationResult>;

    /// Removes `name`
    fn remove(&self, name: &str) -> Result<OperationResult>;
}

impl<M: FeatureManager + ?Sized> FeatureManager for &M {
    fn list_installed(&self) -> Result<FeatureStatus> {
        (**self).list_installed()
    }

    fn install(&self, name: &str, recurse: bool) -> Result<OperationResult> {
        (**self).install(name, recurse)
    }

    fn remove(&self, name: &str) -> Result<OperationResult> {
        (**self).remove(name)
    }
}

/// Per-run settings supplied by whoever invokes the states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Dry-run: report what would change without changing anything
    pub test: bool,
}

impl ExecutionContext {
    pub fn dry_run() -> Self {
        ExecutionContext { test: true }
    }
}
