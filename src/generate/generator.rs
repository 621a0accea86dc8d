use crate::{
    catalog::store::PoseCatalog,
    foundation::core::{PoseId, Sequence, sequence_of},
    foundation::error::{FlowError, FlowResult},
    foundation::rng::RandomSource,
    safety::adjust::apply_safety_adjustments,
    safety::rules::SafetyRules,
};

/// Body area a generated flow should emphasize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Focus {
    /// No particular area; every candidate gets the focus weight.
    #[serde(rename = "Full-Body")]
    FullBody,
    /// Hips.
    Hips,
    /// Hamstrings.
    Hamstrings,
    /// Shoulders.
    Shoulders,
    /// Core.
    Core,
    /// Spine.
    Spine,
    /// Balance.
    Balance,
}

impl Focus {
    /// Tag matched against [`crate::Pose::focus_groups`].
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::FullBody => "Full-Body",
            Self::Hips => "Hips",
            Self::Hamstrings => "Hamstrings",
            Self::Shoulders => "Shoulders",
            Self::Core => "Core",
            Self::Spine => "Spine",
            Self::Balance => "Balance",
        }
    }
}

impl std::str::FromStr for Focus {
    type Err = FlowError;

    fn from_str(s: &str) -> FlowResult<Self> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match norm.as_str() {
            "fullbody" | "full" => Ok(Self::FullBody),
            "hips" => Ok(Self::Hips),
            "hamstrings" => Ok(Self::Hamstrings),
            "shoulders" => Ok(Self::Shoulders),
            "core" => Ok(Self::Core),
            "spine" => Ok(Self::Spine),
            "balance" => Ok(Self::Balance),
            _ => Err(FlowError::validation(format!("unknown focus '{s}'"))),
        }
    }
}

/// Generator tuning. Defaults reproduce the flow builder's sun-salutation skeleton.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Opening skeleton every generated flow starts from.
    pub template: Vec<PoseId>,
    /// Candidates appended by weighted random selection.
    pub pool: Vec<PoseId>,
    /// Assumed average hold used to turn minutes into a pose count.
    pub average_pose_seconds: f64,
    /// Length floor for every generated flow.
    pub min_poses: usize,
    /// Length ceiling; very long practices are cut to this many poses.
    pub max_poses: usize,
    /// Weight of a candidate matching the requested focus; non-matching weigh 1.
    pub focus_weight: f64,
    /// Intensity distance still considered on-target.
    pub intensity_tolerance: u8,
    /// Weight multiplier for candidates outside the intensity tolerance.
    pub off_intensity_factor: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template: sequence_of([
                "child",
                "down_dog",
                "forward_fold",
                "high_lunge_r",
                "warrior1_r",
                "down_dog",
                "forward_fold",
                "child",
            ]),
            pool: sequence_of([
                "warrior1_r",
                "high_lunge_r",
                "twist_low",
                "boat",
                "bridge",
                "pigeon",
                "down_dog",
                "forward_fold",
            ]),
            average_pose_seconds: 45.0,
            min_poses: 6,
            max_poses: 240,
            focus_weight: 2.0,
            intensity_tolerance: 1,
            off_intensity_factor: 0.5,
        }
    }
}

/// What the practitioner asked for.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerateRequest {
    /// Practice length in minutes.
    pub total_minutes: f64,
    /// Desired intensity, 1 to 5.
    pub intensity: u8,
    /// Body area to emphasize.
    pub focus: Focus,
}

impl GenerateRequest {
    /// Bundle a request.
    pub fn new(total_minutes: f64, intensity: u8, focus: Focus) -> Self {
        Self {
            total_minutes,
            intensity,
            focus,
        }
    }
}

/// `round(minutes * 60 / average_pose_seconds)`, clamped to `min_poses..=max_poses`.
///
/// Negative or non-finite minutes count as zero. `min_poses` wins over a smaller
/// `max_poses`.
pub fn target_count(config: &GeneratorConfig, total_minutes: f64) -> usize {
    let minutes = if total_minutes.is_finite() {
        total_minutes.max(0.0)
    } else {
        0.0
    };
    let avg = if config.average_pose_seconds > 0.0 {
        config.average_pose_seconds
    } else {
        45.0
    };
    let n = (minutes * 60.0 / avg).round() as usize;
    n.min(config.max_poses).max(config.min_poses)
}

/// Selection weight of each pool entry, in pool order.
pub fn pool_weights(
    catalog: &PoseCatalog,
    config: &GeneratorConfig,
    request: &GenerateRequest,
) -> Vec<f64> {
    config
        .pool
        .iter()
        .map(|id| {
            let pose = catalog.lookup(id);
            let on_focus = request.focus == Focus::FullBody
                || pose.is_some_and(|p| p.has_focus(request.focus.as_tag()));
            let mut w = if on_focus { config.focus_weight } else { 1.0 };
            if let Some(i) = pose.and_then(|p| p.intensity)
                && i.abs_diff(request.intensity) > config.intensity_tolerance
            {
                w *= config.off_intensity_factor;
            }
            if w.is_finite() { w.max(0.0) } else { 0.0 }
        })
        .collect()
}

/// Roulette-wheel pick. `None` when no weight is positive.
pub fn weighted_pick<R: RandomSource>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let sum: f64 = weights.iter().sum();
    if sum.is_nan() || sum <= 0.0 {
        return None;
    }
    let mut r = rng.next_f64_01() * sum;
    let mut last_positive = None;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if r < w {
            return Some(i);
        }
        r -= w;
        last_positive = Some(i);
    }
    last_positive
}

/// Build a flow of roughly `total_minutes` from the template plus weighted pool picks.
///
/// Safety repair runs after every pick so the next pick sees a repaired flow. After the
/// target length is reached the flow is truncated to `max(target, min_poses)` and
/// repaired once more, so a trailing counter pose cut by truncation is restored. The
/// result may therefore be one pose longer than the target, and is always stable under
/// [`apply_safety_adjustments`].
#[tracing::instrument(skip(catalog, rules, config, rng), fields(target_len = tracing::field::Empty))]
pub fn generate<R: RandomSource>(
    catalog: &PoseCatalog,
    rules: &SafetyRules,
    config: &GeneratorConfig,
    request: &GenerateRequest,
    rng: &mut R,
) -> Sequence {
    let target = target_count(config, request.total_minutes);
    tracing::Span::current().record("target_len", target as u64);

    let weights = pool_weights(catalog, config, request);
    let mut seq = config.template.clone();
    while seq.len() < target {
        let Some(pick) = weighted_pick(&weights, rng) else {
            tracing::warn!(
                pool = config.pool.len(),
                "generator pool has no positive weight; stopping early"
            );
            break;
        };
        tracing::debug!(pose = %config.pool[pick], len = seq.len(), "picked pool pose");
        seq.push(config.pool[pick].clone());
        seq = apply_safety_adjustments(catalog, rules, &seq);
    }

    let mut out = apply_safety_adjustments(catalog, rules, &seq);
    out.truncate(target.max(config.min_poses));
    apply_safety_adjustments(catalog, rules, &out)
}

/// Shuffle an existing flow and repair it.
pub fn reshuffle<R: RandomSource>(
    catalog: &PoseCatalog,
    rules: &SafetyRules,
    seq: &[PoseId],
    rng: &mut R,
) -> Sequence {
    let mut out = seq.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.next_index(i + 1);
        out.swap(i, j);
    }
    apply_safety_adjustments(catalog, rules, &out)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/generator.rs"]
mod tests;
