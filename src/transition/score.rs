use crate::{catalog::pose::Pose, safety::rules::SafetyRules};

/// Tunable constants for [`score`].
///
/// Defaults keep three orderings intact: a declared transition outweighs everything
/// else, an unsafe pair scores below any safe pair at a similar intensity, and a
/// smaller intensity jump always beats a larger one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Bonus when the catalog declares `from -> to` a natural transition.
    pub declared_transition: f64,
    /// Bonus for staying inside one family.
    pub same_family: f64,
    /// Bonus for staying in one plane of movement.
    pub same_plane: f64,
    /// Penalty for an unsafe family pair.
    pub unsafe_pair: f64,
    /// Penalty per step of intensity difference.
    pub intensity_step: f64,
    /// Scores above this need no bridging pose.
    pub good_enough: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            declared_transition: 12.0,
            same_family: 3.0,
            same_plane: 1.0,
            unsafe_pair: 20.0,
            intensity_step: 1.5,
            good_enough: 5.0,
        }
    }
}

/// Compatibility of the ordered pair `from -> to`. Higher is smoother.
///
/// Absent poses score `0`. Absent family, plane or intensity contribute nothing to
/// their term.
pub fn score(
    weights: &ScoreWeights,
    rules: &SafetyRules,
    from: Option<&Pose>,
    to: Option<&Pose>,
) -> f64 {
    let (Some(from), Some(to)) = (from, to) else {
        return 0.0;
    };

    let mut s = 0.0;
    if from.declares_transition_to(to) {
        s += weights.declared_transition;
    }
    if let (Some(a), Some(b)) = (&from.family, &to.family)
        && a == b
    {
        s += weights.same_family;
    }
    if let (Some(a), Some(b)) = (&from.plane, &to.plane)
        && a.eq_ignore_ascii_case(b)
    {
        s += weights.same_plane;
    }
    if rules.is_unsafe_transition(Some(from), Some(to)) {
        s -= weights.unsafe_pair;
    }
    if let (Some(a), Some(b)) = (from.intensity, to.intensity) {
        s -= weights.intensity_step * f64::from(a.abs_diff(b));
    }
    s
}

#[cfg(test)]
#[path = "../../tests/unit/transition/score.rs"]
mod tests;
