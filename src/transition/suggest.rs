use crate::{
    catalog::pose::{Family, Pose},
    catalog::store::PoseCatalog,
    foundation::core::PoseId,
    foundation::rng::RandomSource,
    generate::generator::Focus,
    safety::rules::SafetyRules,
    transition::score::{ScoreWeights, score},
};

/// Families preferred when bridging an awkward transition.
pub const NEUTRAL_BRIDGE_FAMILIES: [Family; 3] =
    [Family::Restorative, Family::Standing, Family::ForwardFold];

/// Score given to the mirror-side pose of a bilateral pose.
pub const BILATERAL_SCORE: f64 = 1000.0;

/// Extra score for counter poses after two demanding poses in a row.
pub const COUNTER_POSE_BOOST: f64 = 50.0;

/// Combined intensity of the last two poses above which counter poses get boosted.
const DEMANDING_PAIR_INTENSITY: u8 = 8;

/// Default length of [`next_pose_suggestions`].
pub const NEXT_SUGGESTION_LIMIT: usize = 5;

/// Default length of [`suggestion_palette`].
pub const PALETTE_LIMIT: usize = 12;

/// Scoring context shared by the suggestion helpers.
#[derive(Clone, Copy, Debug)]
pub struct Scorer<'a> {
    /// Scoring constants.
    pub weights: &'a ScoreWeights,
    /// Safety table used for the unsafe-pair penalty.
    pub rules: &'a SafetyRules,
}

impl<'a> Scorer<'a> {
    /// Bundle scoring inputs.
    pub fn new(weights: &'a ScoreWeights, rules: &'a SafetyRules) -> Self {
        Self { weights, rules }
    }

    /// Score the ordered pair `from -> to`.
    pub fn score(&self, from: Option<&Pose>, to: Option<&Pose>) -> f64 {
        score(self.weights, self.rules, from, to)
    }
}

/// Rank `candidates` against `current` and return the best `count`.
///
/// Without an anchor pose, a random subset of `candidates` is returned instead; variety
/// matters more than ranking there. Ties keep candidate order.
pub fn select_best_transition_poses<R: RandomSource>(
    scorer: Scorer<'_>,
    current: Option<&Pose>,
    candidates: &[Pose],
    count: usize,
    rng: &mut R,
) -> Vec<Pose> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let take = count.min(candidates.len());

    let Some(current) = current else {
        // Partial Fisher-Yates over indices.
        let mut idx: Vec<usize> = (0..candidates.len()).collect();
        for i in 0..take {
            let j = i + rng.next_index(idx.len() - i);
            idx.swap(i, j);
        }
        return idx[..take].iter().map(|&i| candidates[i].clone()).collect();
    };

    let mut scored: Vec<(f64, &Pose)> = candidates
        .iter()
        .map(|c| (scorer.score(Some(current), Some(c)), c))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(take)
        .map(|(_, p)| p.clone())
        .collect()
}

/// Offer a bridging pose between `from` and `to` when their direct transition is weak.
///
/// Returns `None` when the direct score already exceeds the "good enough" threshold, or
/// when `available` is empty. Otherwise prefers the neutral-family candidate that beats
/// the direct score on both sides, best combined score first, and falls back to the
/// first available pose. `from` and `to` themselves are never offered.
pub fn suggest_transition_pose<'p>(
    scorer: Scorer<'_>,
    from: Option<&Pose>,
    to: Option<&Pose>,
    available: &'p [Pose],
) -> Option<&'p Pose> {
    let direct = scorer.score(from, to);
    if direct > scorer.weights.good_enough {
        return None;
    }
    let is_endpoint = |cand: &Pose| {
        from.is_some_and(|p| p.id == cand.id) || to.is_some_and(|p| p.id == cand.id)
    };

    let mut best: Option<(f64, &Pose)> = None;
    for cand in available.iter().filter(|c| !is_endpoint(*c)) {
        let neutral = cand
            .family
            .as_ref()
            .is_some_and(|f| NEUTRAL_BRIDGE_FAMILIES.contains(f));
        if !neutral {
            continue;
        }
        let inbound = scorer.score(from, Some(cand));
        let outbound = scorer.score(Some(cand), to);
        if inbound <= direct || outbound <= direct {
            continue;
        }
        let combined = inbound + outbound;
        if best.is_none_or(|(b, _)| combined > b) {
            best = Some((combined, cand));
        }
    }

    match best {
        Some((combined, pose)) => {
            tracing::debug!(bridge = %pose.id, combined, direct, "bridging pose found");
            Some(pose)
        }
        None => available.iter().find(|c| !is_endpoint(*c)),
    }
}

/// Gentle openers for an empty flow: poses with intensity at most 2, in catalog order.
pub fn starting_pose_suggestions(catalog: &PoseCatalog, count: usize) -> Vec<&Pose> {
    catalog
        .poses()
        .iter()
        .filter(|p| p.intensity.unwrap_or(3) <= 2)
        .take(count)
        .collect()
}

/// Ranked follow-ups for a flow under construction.
///
/// Candidates come from three sources, strongest first:
/// - the other side of a bilateral pose, unless the flow just came from it
/// - declared transitions out of the last pose and the counter poses its family needs,
///   scored against the last pose; counter poses gain [`COUNTER_POSE_BOOST`] when the
///   last two intensities add up to more than 8
/// - poses of the same level, at score `1`, while fewer than `limit` candidates exist
///
/// A pose reached through several sources keeps its best score. Poses already in the flow
/// are never offered. An empty flow, or one ending in an unknown pose, gets
/// [`starting_pose_suggestions`].
pub fn next_pose_suggestions<'c>(
    scorer: Scorer<'_>,
    catalog: &'c PoseCatalog,
    flow: &[PoseId],
    limit: usize,
) -> Vec<&'c Pose> {
    let Some(last) = flow.last().and_then(|id| catalog.lookup(id)) else {
        return starting_pose_suggestions(catalog, limit);
    };
    let second_last = flow
        .len()
        .checked_sub(2)
        .and_then(|i| catalog.lookup(&flow[i]));

    let mut found: Vec<(f64, &'c Pose)> = Vec::new();

    if let Some(other) = last
        .other_side_slug
        .as_deref()
        .and_then(|slug| catalog.lookup_slug(slug))
        && second_last.is_none_or(|p| p.id != other.id)
    {
        found.push((BILATERAL_SCORE, other));
    }

    let counters = last
        .family
        .as_ref()
        .map(|f| scorer.rules.counter_poses_for(f))
        .unwrap_or(&[]);
    let demanding = last.intensity.unwrap_or(0).saturating_add(
        second_last.and_then(|p| p.intensity).unwrap_or(0),
    ) > DEMANDING_PAIR_INTENSITY;

    for cand in catalog.poses() {
        let is_counter = counters.contains(&cand.id);
        if !is_counter && !last.declares_transition_to(cand) {
            continue;
        }
        let mut s = scorer.score(Some(last), Some(cand));
        if is_counter && demanding {
            s += COUNTER_POSE_BOOST;
        }
        found.push((s, cand));
    }

    if found.len() < limit
        && let Some(level) = last.level.as_deref()
    {
        found.extend(
            catalog
                .poses()
                .iter()
                .filter(|p| p.level.as_deref() == Some(level))
                .map(|p| (1.0, p)),
        );
    }

    let mut ranked: Vec<(f64, &'c Pose)> = Vec::with_capacity(found.len());
    for (s, pose) in found {
        if flow.contains(&pose.id) {
            continue;
        }
        match ranked.iter_mut().find(|(_, p)| p.id == pose.id) {
            Some(slot) => slot.0 = slot.0.max(s),
            None => ranked.push((s, pose)),
        }
    }
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(limit);
    tracing::debug!(after = %last.id, offered = ranked.len(), demanding, "next pose suggestions");
    ranked.into_iter().map(|(_, p)| p).collect()
}

/// Poses to browse while building a flow by hand.
///
/// Keeps poses within one step of `intensity` (clamped to `1..=5`; a pose without an
/// intensity counts as 3). With a focus other than [`Focus::FullBody`], poses carrying
/// the focus tag come first. Catalog order is kept otherwise.
pub fn suggestion_palette(
    catalog: &PoseCatalog,
    intensity: u8,
    focus: Focus,
    limit: usize,
) -> Vec<&Pose> {
    let lo = intensity.saturating_sub(1).max(1);
    let hi = intensity.saturating_add(1).min(5);
    let band = catalog
        .poses()
        .iter()
        .filter(|p| (lo..=hi).contains(&p.intensity.unwrap_or(3)));

    if focus == Focus::FullBody {
        return band.take(limit).collect();
    }
    let (focused, rest): (Vec<&Pose>, Vec<&Pose>) =
        band.partition(|p| p.has_focus(focus.as_tag()));
    focused.into_iter().chain(rest).take(limit).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/transition/suggest.rs"]
mod tests;
