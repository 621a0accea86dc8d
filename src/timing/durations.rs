use crate::{
    catalog::store::PoseCatalog,
    foundation::core::{PoseId, Tempo},
    timing::overrides::DurationOverrides,
};

/// How per-pose durations are entered and displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// Plain seconds.
    #[default]
    Seconds,
    /// Whole breaths of `breath_seconds` each.
    Breaths,
}

/// Session timing settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds or breaths.
    pub mode: TimingMode,
    /// Length of one breath in breaths mode.
    pub breath_seconds: u32,
    /// Gap between consecutive poses.
    pub transition_seconds: u32,
    /// Closing rest (savasana) length.
    pub cooldown_seconds: u32,
    /// Playback speed.
    pub tempo: Tempo,
    /// Lower bound for a seconds-mode override.
    pub override_min_seconds: u32,
    /// Upper bound for a seconds-mode override.
    pub override_max_seconds: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            mode: TimingMode::Seconds,
            breath_seconds: 5,
            transition_seconds: 5,
            cooldown_seconds: 120,
            tempo: Tempo::default(),
            override_min_seconds: 5,
            override_max_seconds: 600,
        }
    }
}

/// Catalog default for every pose in `seq`; unknown ids get the 45 s fallback.
pub fn base_durations(catalog: &PoseCatalog, seq: &[PoseId]) -> Vec<u32> {
    seq.iter().map(|id| catalog.default_seconds(id)).collect()
}

/// Copy of `base` with usable overrides applied.
///
/// An override is used when it is finite, positive and its index is in bounds. Values
/// are floored, with a one second minimum. Anything else is ignored.
pub fn apply_overrides(base: &[u32], overrides: &DurationOverrides) -> Vec<u32> {
    let mut out = base.to_vec();
    for (i, v) in overrides.iter() {
        if !v.is_finite() || v <= 0.0 {
            continue;
        }
        if let Some(slot) = out.get_mut(i) {
            *slot = (v.floor() as u32).max(1);
        }
    }
    out
}

/// Scale `seconds` by a playback tempo clamped to `[0.25, 4]`: `max(1, round(seconds / tempo))`.
pub fn tempo_adjust(seconds: f64, tempo: f64) -> u32 {
    let t = Tempo::new(tempo).factor();
    (seconds / t).round().max(1.0) as u32
}

/// Round `seconds` to whole breaths: `max(1, round(s / b)) * b` with `b >= 1`.
pub fn quantize_to_breaths(seconds: u32, breath_seconds: u32) -> u32 {
    let b = breath_seconds.max(1);
    let breaths = ((f64::from(seconds) / f64::from(b)).round() as u32).max(1);
    breaths.saturating_mul(b)
}

/// Effective per-pose durations: catalog defaults, then overrides, then breath rounding
/// in breaths mode, then tempo.
pub fn pose_durations(
    catalog: &PoseCatalog,
    seq: &[PoseId],
    overrides: &DurationOverrides,
    config: &TimingConfig,
) -> Vec<u32> {
    apply_overrides(&base_durations(catalog, seq), overrides)
        .into_iter()
        .map(|s| match config.mode {
            TimingMode::Seconds => s,
            TimingMode::Breaths => quantize_to_breaths(s, config.breath_seconds),
        })
        .map(|s| tempo_adjust(f64::from(s), config.tempo.factor()))
        .collect()
}

/// Turn a user-entered duration into an override value in seconds.
///
/// Seconds mode clamps into `[override_min_seconds, override_max_seconds]`; breaths mode
/// reads `input` as a breath count of at least one. Non-finite input yields `None`.
pub fn override_from_input(input: f64, config: &TimingConfig) -> Option<f64> {
    if !input.is_finite() {
        return None;
    }
    let secs = match config.mode {
        TimingMode::Seconds => {
            let lo = config.override_min_seconds.max(1);
            let hi = config.override_max_seconds.max(lo);
            input.max(1.0).clamp(f64::from(lo), f64::from(hi))
        }
        TimingMode::Breaths => {
            let breaths = input.round().max(1.0);
            breaths * f64::from(config.breath_seconds.max(1))
        }
    };
    Some(secs)
}

#[cfg(test)]
#[path = "../../tests/unit/timing/durations.rs"]
mod tests;
