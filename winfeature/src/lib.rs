//! Windows Server feature states
//!
//! Idempotent `installed` / `removed` states for Windows Server roles and
//! features. The states read the installed features, make at most one
//! install or remove call when the host disagrees with the desired state,
//! and return a [`ConvergenceReport`] describing what changed.
//!
//! All host access goes through the [`FeatureManager`] trait. On Windows,
//! `ServerManager` implements it on top of the ServerManager PowerShell
//! module.
//!
//! # Example
//!
//! ```ignore
//! use winfeature::{installed, ExecutionContext, ServerManager};
//!
//! fn main() -> winfeature::Result<()> {
//!     let manager = ServerManager::connect()?;
//!     let report = installed(&manager, &ExecutionContext::default(), "Web-Server", true, false);
//!     println!("{}: {:?} {}", report.name, report.result, report.comment);
//!     Ok(())
//! }
//! ```

mod compare;
mod error;
mod feature;
mod manager;
mod operation;
pub mod powershell;
mod report;
mod state;

pub use compare::{compare, FeatureChange, FeatureChanges};
pub use error::{Error, Result};
pub use feature::{validate_name, FeatureInfo, FeatureStatus, InstallState};
pub use manager::{ExecutionContext, FeatureManager};
pub use operation::{ExitCode, OperationResult};
#[cfg(windows)]
pub use powershell::ServerManager;
pub use report::{ConvergenceReport, ReportBuilder};
pub use state::{installed, removed};
