//! Convergence report returned by every state call

use crate::compare::FeatureChanges;
use serde::{Deserialize, Serialize};

/// Result of one state invocation.
///
/// `result` is `Some(true)` when the feature is (or was brought) into the
/// desired state, `Some(false)` on failure, and `None` for a dry run that
/// would have made a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub name: String,
    pub result: Option<bool>,
    pub changes: FeatureChanges,
    pub comment: String,
}

impl ConvergenceReport {
    pub fn succeeded(&self) -> bool {
        self.result == Some(true)
    }

    pub fn failed(&self) -> bool {
        self.result == Some(false)
    }

    pub fn pending(&self) -> bool {
        self.result.is_none()
    }

    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Builds a [`ConvergenceReport`] in order: set the comment while deciding,
/// then close with exactly one terminal call. `changes` can only be supplied
/// by [`ReportBuilder::finish`], so it is assigned at most once.
#[derive(Debug)]
pub struct ReportBuilder {
    name: String,
    comment: String,
}

impl ReportBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ReportBuilder {
            name: name.into(),
            comment: String::new(),
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Desired state already holds; nothing was changed.
    pub fn satisfied(self) -> ConvergenceReport {
        self.build(Some(true), FeatureChanges::new())
    }

    /// Dry run: a change would be made but was not attempted.
    pub fn pending(self) -> ConvergenceReport {
        self.build(None, FeatureChanges::new())
    }

    /// Failure before any change could be observed.
    pub fn failed(self, comment: impl Into<String>) -> ConvergenceReport {
        self.comment(comment).build(Some(false), FeatureChanges::new())
    }

    /// Mutation attempted; `changes` is the before/after diff.
    pub fn finish(self, success: bool, changes: FeatureChanges) -> ConvergenceReport {
        self.build(Some(success), changes)
    }

    fn build(self, result: Option<bool>, changes: FeatureChanges) -> ConvergenceReport {
        ConvergenceReport {
            name: self.name,
            result,
            changes,
            comment: self.comment,
        }
    }
}
