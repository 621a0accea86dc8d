use crate::{
    catalog::pose::Family,
    catalog::store::PoseCatalog,
    foundation::core::{PoseId, Sequence},
    safety::rules::SafetyRules,
};

/// Repair unsafe adjacencies in a single left-to-right pass.
///
/// For each input pose:
/// 1. if the last pose already emitted forms an unsafe pair with it, emit the neutral pose first
/// 2. emit the pose
/// 3. if its family needs a counter pose and it is the last input or the next input would be
///    unsafe after it, emit the family's first counter pose
///
/// The pass is idempotent: running it on its own output returns that output unchanged.
pub fn apply_safety_adjustments(
    catalog: &PoseCatalog,
    rules: &SafetyRules,
    seq: &[PoseId],
) -> Sequence {
    let mut out = Sequence::with_capacity(seq.len());
    for (i, cur) in seq.iter().enumerate() {
        let after_unsafe = out
            .last()
            .is_some_and(|prev| rules.is_unsafe_adjacent(catalog, prev, cur));
        if after_unsafe {
            tracing::debug!(%cur, at = out.len(), "inserting neutral pose");
            out.push(rules.neutral_pose.clone());
        }
        out.push(cur.clone());

        let counters = rules.requires_counter_pose(catalog, cur);
        if let Some(counter) = counters.first() {
            let needs_counter = match seq.get(i + 1) {
                None => true,
                Some(next) => rules.is_unsafe_adjacent(catalog, cur, next),
            };
            if needs_counter {
                tracing::debug!(%cur, %counter, "inserting counter pose");
                out.push(counter.clone());
            }
        }
    }
    out
}

/// Whether `seq` is already stable under [`apply_safety_adjustments`].
pub fn is_safety_stable(catalog: &PoseCatalog, rules: &SafetyRules, seq: &[PoseId]) -> bool {
    apply_safety_adjustments(catalog, rules, seq) == seq
}

/// Short rule-derived explanation of why a pose sits where it does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachTip {
    /// A neutral pose separates this pose from an unsafe predecessor.
    NeutralInserted,
    /// Twist: lengthen first, return to neutral afterwards.
    Twist,
    /// Backbend: follows prep, countered with a fold or child's pose.
    Backbend,
    /// Inversion-lite reset.
    Inversion,
    /// Default balance note.
    Balance,
}

impl CoachTip {
    /// Text shown to the practitioner.
    pub fn message(self) -> &'static str {
        match self {
            Self::NeutralInserted => "Neutral pose inserted to protect the spine.",
            Self::Twist => "Twist after lengthening to protect discs; return to neutral afterward.",
            Self::Backbend => "Backbend follows prep; counter with a fold or child's pose.",
            Self::Inversion => "Inversion-lite to elongate spine and reset breath.",
            Self::Balance => "Balances sequence based on focus and intensity.",
        }
    }
}

/// Pick the coach tip for `id` given the pose before it.
pub fn coach_tip(
    catalog: &PoseCatalog,
    rules: &SafetyRules,
    prev: Option<&PoseId>,
    id: &PoseId,
) -> CoachTip {
    if let Some(prev) = prev
        && rules.is_unsafe_adjacent(catalog, prev, id)
    {
        return CoachTip::NeutralInserted;
    }
    match catalog.family_of(id) {
        Some(Family::Twist) => CoachTip::Twist,
        Some(Family::Backbend) => CoachTip::Backbend,
        Some(Family::Inversion) => CoachTip::Inversion,
        _ => CoachTip::Balance,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/safety/adjust.rs"]
mod tests;
