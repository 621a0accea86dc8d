use std::{collections::BTreeSet, path::Path};

use crate::{
    catalog::store::PoseCatalog,
    foundation::core::PoseId,
    foundation::error::{FlowError, FlowResult},
    generate::generator::GeneratorConfig,
    safety::rules::SafetyRules,
    timing::durations::TimingConfig,
    transition::score::ScoreWeights,
};

/// Every tunable table of the engine in one place.
///
/// Each section falls back to its defaults when missing, so `{}` is a valid
/// configuration and reproduces the built-in behavior.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Transition scoring constants.
    pub scoring: ScoreWeights,
    /// Safety rule table.
    pub safety: SafetyRules,
    /// Flow generator tuning.
    pub generator: GeneratorConfig,
    /// Session timing settings.
    pub timing: TimingConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    #[tracing::instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> FlowResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> FlowResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            FlowError::Other(
                anyhow::Error::new(e).context(format!("read engine config '{}'", path.display())),
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values no operation can work with.
    pub fn validate(&self) -> FlowResult<()> {
        let s = &self.scoring;
        for (name, v) in [
            ("scoring.declared_transition", s.declared_transition),
            ("scoring.same_family", s.same_family),
            ("scoring.same_plane", s.same_plane),
            ("scoring.unsafe_pair", s.unsafe_pair),
            ("scoring.intensity_step", s.intensity_step),
            ("scoring.good_enough", s.good_enough),
        ] {
            if !v.is_finite() {
                return Err(FlowError::validation(format!("{name} must be finite")));
            }
        }

        let g = &self.generator;
        if !(g.average_pose_seconds.is_finite() && g.average_pose_seconds > 0.0) {
            return Err(FlowError::validation(
                "generator.average_pose_seconds must be > 0",
            ));
        }
        if g.max_poses < g.min_poses {
            return Err(FlowError::validation(format!(
                "generator.max_poses ({}) is below min_poses ({})",
                g.max_poses, g.min_poses
            )));
        }
        for (name, v) in [
            ("generator.focus_weight", g.focus_weight),
            ("generator.off_intensity_factor", g.off_intensity_factor),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(FlowError::validation(format!("{name} must be >= 0")));
            }
        }

        let t = &self.timing;
        if t.breath_seconds == 0 {
            return Err(FlowError::validation("timing.breath_seconds must be > 0"));
        }
        if t.override_min_seconds > t.override_max_seconds {
            return Err(FlowError::validation(format!(
                "timing.override_min_seconds ({}) exceeds override_max_seconds ({})",
                t.override_min_seconds, t.override_max_seconds
            )));
        }
        Ok(())
    }

    /// Pose ids named by the configuration that `catalog` does not know, sorted.
    ///
    /// Unknown ids are tolerated at run time; this is for reporting.
    pub fn unknown_pose_ids(&self, catalog: &PoseCatalog) -> Vec<PoseId> {
        let safety = &self.safety;
        let named = self
            .generator
            .template
            .iter()
            .chain(&self.generator.pool)
            .chain(safety.counter_poses.values().flatten())
            .chain(std::iter::once(&safety.neutral_pose));

        named
            .filter(|id| catalog.lookup(id).is_none())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
