//! Declarative Windows feature state runner
//!
//! Applies the `[[feature]]` states of a TOML document in order through
//! [`winfeature`] and collects one report per state.

pub mod args;
pub mod config;

use std::fmt;

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use winfeature::{installed, removed, ConvergenceReport, ExecutionContext, FeatureManager};

pub use config::{Config, ConfigError, ConfigSource, Ensure, EnsureKind, FeatureState};

// =============================================================================
// Tracing Initialization
// =============================================================================

/// Initialize tracing/logging with the given filter level
///
/// Logs go to stderr so stdout only carries the JSON reports.
pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Running states
// =============================================================================

/// Report for one declared state
#[derive(Debug, Clone, Serialize)]
pub struct StateOutcome {
    pub id: String,
    #[serde(flatten)]
    pub report: ConvergenceReport,
}

/// Per-run counts, printed after the reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub changed: usize,
    pub pending: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[StateOutcome]) -> Self {
        outcomes.iter().fold(Summary::default(), |mut s, o| {
            match o.report.result {
                Some(true) => s.succeeded += 1,
                Some(false) => s.failed += 1,
                None => s.pending += 1,
            }
            if o.report.changed() {
                s.changed += 1;
            }
            s
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "succeeded={} failed={} changed={} pending={}",
            self.succeeded, self.failed, self.changed, self.pending
        )
    }
}

/// Applies a single declared state
pub fn apply<M>(manager: &M, ctx: &ExecutionContext, state: &FeatureState) -> StateOutcome
where
    M: FeatureManager + ?Sized,
{
    let span = tracing::info_span!("state", id = state.id());
    let _guard = span.enter();

    let report = match state.ensure() {
        Ensure::Installed { recurse, force } => {
            installed(manager, ctx, &state.name, recurse, force)
        }
        Ensure::Removed => removed(manager, ctx, &state.name),
    };

    tracing::info!(result = ?report.result, "{}", report.comment);

    StateOutcome {
        id: state.id().to_string(),
        report,
    }
}

/// Applies every state in document order; a failed state does not stop the run
pub fn run<M>(manager: &M, ctx: &ExecutionContext, states: &[FeatureState]) -> Vec<StateOutcome>
where
    M: FeatureManager + ?Sized,
{
    states.iter().map(|state| apply(manager, ctx, state)).collect()
}

// =============================================================================
// Tests
// =============================================================================
