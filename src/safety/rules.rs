use std::collections::BTreeMap;

use crate::{
    catalog::pose::{Family, Pose},
    catalog::store::PoseCatalog,
    foundation::core::PoseId,
};

/// Static safety rule table.
///
/// Extending the rule set means adding rows here, not new code paths:
/// - `unsafe_pairs`: unordered family pairs that must not sit back-to-back
/// - `counter_poses`: per-family counter-pose list, first entry is the default pick
/// - `neutral_pose`: inserted between an unsafe pair
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SafetyRules {
    /// Unordered family pairs that are unsafe when adjacent.
    pub unsafe_pairs: Vec<[Family; 2]>,
    /// Counter poses keyed by the family that requires them.
    pub counter_poses: BTreeMap<Family, Vec<PoseId>>,
    /// Pose inserted between an unsafe pair.
    pub neutral_pose: PoseId,
}

impl Default for SafetyRules {
    fn default() -> Self {
        let counters = vec![PoseId::new("forward_fold"), PoseId::new("child")];
        Self {
            unsafe_pairs: vec![[Family::Twist, Family::Backbend]],
            counter_poses: BTreeMap::from([
                (Family::Twist, counters.clone()),
                (Family::Backbend, counters),
            ]),
            neutral_pose: PoseId::new("forward_fold"),
        }
    }
}

impl SafetyRules {
    /// Whether `{a, b}` is listed as an unsafe pair, in either order.
    pub fn is_unsafe_pair(&self, a: &Family, b: &Family) -> bool {
        self.unsafe_pairs
            .iter()
            .any(|[x, y]| (x == a && y == b) || (x == b && y == a))
    }

    /// Pose-level check. Missing poses or families are never unsafe.
    pub fn is_unsafe_transition(&self, from: Option<&Pose>, to: Option<&Pose>) -> bool {
        match (
            from.and_then(|p| p.family.as_ref()),
            to.and_then(|p| p.family.as_ref()),
        ) {
            (Some(a), Some(b)) => self.is_unsafe_pair(a, b),
            _ => false,
        }
    }

    /// Id-level check through the catalog. Unknown ids are never unsafe.
    pub fn is_unsafe_adjacent(&self, catalog: &PoseCatalog, a: &PoseId, b: &PoseId) -> bool {
        self.is_unsafe_transition(catalog.lookup(a), catalog.lookup(b))
    }

    /// Counter poses required after `family`; empty when none are needed.
    pub fn counter_poses_for(&self, family: &Family) -> &[PoseId] {
        self.counter_poses
            .get(family)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Counter poses required after pose `id`; empty when the pose is unknown or needs none.
    pub fn requires_counter_pose(&self, catalog: &PoseCatalog, id: &PoseId) -> &[PoseId] {
        catalog
            .family_of(id)
            .map(|f| self.counter_poses_for(f))
            .unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/safety/rules.rs"]
mod tests;
