//! Diff between two feature status snapshots

use crate::feature::{FeatureInfo, FeatureStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Before/after value of one feature. `None` means absent from that snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureChange {
    pub old: Option<FeatureInfo>,
    pub new: Option<FeatureInfo>,
}

pub type FeatureChanges = BTreeMap<String, FeatureChange>;

/// Computes every feature that was added, removed, or altered between `before` and `after`.
pub fn compare(before: &FeatureStatus, after: &FeatureStatus) -> FeatureChanges {
    let mut changes = FeatureChanges::new();

    for (name, old) in before {
        match after.get(name) {
            Some(new) if new == old => {}
            new => {
                changes.insert(
                    name.clone(),
                    FeatureChange {
                        old: Some(old.clone()),
                        new: new.cloned(),
                    },
                );
            }
        }
    }

    for (name, new) in after {
        if !before.contains_key(name) {
            changes.insert(
                name.clone(),
                FeatureChange {
                    old: None,
                    new: Some(new.clone()),
                },
            );
        }
    }

    changes
}
