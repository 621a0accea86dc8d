use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use crate::{
    catalog::pose::{DEFAULT_POSE_SECONDS, Family, Pose},
    foundation::core::PoseId,
    foundation::error::{FlowError, FlowResult},
};

/// Read-only pose library.
///
/// Built once at startup and then only queried. Lookups of unknown ids return `None`;
/// callers fall back to documented defaults instead of failing.
#[derive(Clone, Debug, Default)]
pub struct PoseCatalog {
    poses: Vec<Pose>,
    index: BTreeMap<PoseId, usize>,
}

impl PoseCatalog {
    /// Validate `poses` and build a catalog.
    ///
    /// Ids must be unique and non-empty, intensities within `1..=5`, and default
    /// durations positive.
    pub fn new(poses: Vec<Pose>) -> FlowResult<Self> {
        let mut seen = BTreeSet::<&PoseId>::new();
        for pose in &poses {
            if pose.id.as_str().trim().is_empty() {
                return Err(FlowError::catalog("pose id must be non-empty"));
            }
            if !seen.insert(&pose.id) {
                return Err(FlowError::catalog(format!(
                    "duplicate pose id '{}'",
                    pose.id
                )));
            }
            if let Some(i) = pose.intensity
                && !(1..=5).contains(&i)
            {
                return Err(FlowError::validation(format!(
                    "pose '{}' intensity must be in 1..=5, got {i}",
                    pose.id
                )));
            }
            if pose.default_seconds == 0 {
                return Err(FlowError::validation(format!(
                    "pose '{}' default_seconds must be > 0",
                    pose.id
                )));
            }
        }
        Ok(Self::index(poses))
    }

    fn index(poses: Vec<Pose>) -> Self {
        let index = poses
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self { poses, index }
    }

    /// Parse a JSON array of pose records.
    #[tracing::instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> FlowResult<Self> {
        let poses: Vec<Pose> = serde_json::from_str(json)?;
        let catalog = Self::new(poses)?;
        tracing::debug!(poses = catalog.len(), "loaded pose catalog");
        Ok(catalog)
    }

    /// Read and parse a JSON catalog file.
    pub fn from_path(path: &Path) -> FlowResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            FlowError::Other(anyhow::Error::new(e).context(format!(
                "read pose catalog '{}'",
                path.display()
            )))
        })?;
        Self::from_json_str(&json)
    }

    /// Look up a pose by id.
    pub fn lookup(&self, id: &PoseId) -> Option<&Pose> {
        self.index.get(id).map(|&i| &self.poses[i])
    }

    /// Look up a pose by slug. Empty slugs never match.
    pub fn lookup_slug(&self, slug: &str) -> Option<&Pose> {
        if slug.is_empty() {
            return None;
        }
        self.poses.iter().find(|p| p.slug == slug)
    }

    /// Family of `id`, if the pose is known and has one.
    pub fn family_of(&self, id: &PoseId) -> Option<&Family> {
        self.lookup(id).and_then(|p| p.family.as_ref())
    }

    /// Catalog default hold time for `id`, or [`DEFAULT_POSE_SECONDS`] when unknown.
    pub fn default_seconds(&self, id: &PoseId) -> u32 {
        self.lookup(id)
            .map(|p| p.default_seconds)
            .unwrap_or(DEFAULT_POSE_SECONDS)
    }

    /// Resolve ids to pose records, skipping unknown ids.
    pub fn resolve<'a>(&'a self, ids: &[PoseId]) -> Vec<&'a Pose> {
        ids.iter().filter_map(|id| self.lookup(id)).collect()
    }

    /// All poses in catalog order.
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Number of poses.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Return `true` when the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// The ten-pose starter library used by the flow builder.
    pub fn builtin() -> Self {
        Self::index(vec![
            Pose::new("butterfly")
                .with_names("Butterfly Pose", "Baddha Konasana")
                .with_level("beginner")
                .with_family(Family::Seated)
                .with_intensity(2)
                .with_focus(["Hips", "Groin"])
                .with_seconds(60)
                .with_plane("sagittal"),
            Pose::new("forward_fold")
                .with_slug("forward-fold")
                .with_names("Standing Forward Fold", "Uttanasana")
                .with_level("beginner")
                .with_family(Family::ForwardFold)
                .with_intensity(2)
                .with_focus(["Hamstrings", "Spine"])
                .with_seconds(60)
                .with_plane("sagittal")
                .leads_to(["high-lunge-r", "down-dog"])
                .entered_from(["down-dog"]),
            Pose::new("down_dog")
                .with_slug("down-dog")
                .with_names("Downward Facing Dog", "Adho Mukha Svanasana")
                .with_level("beginner")
                .with_family(Family::Inversion)
                .with_intensity(3)
                .with_focus(["Shoulders", "Hamstrings", "Spine"])
                .with_seconds(45)
                .with_plane("sagittal")
                .leads_to(["forward-fold", "high-lunge-r"])
                .entered_from(["child"]),
            Pose::new("warrior1_r")
                .with_slug("warrior1-r")
                .with_names("Warrior I (Right)", "Virabhadrasana I")
                .with_level("intermediate")
                .with_family(Family::Standing)
                .with_intensity(3)
                .with_focus(["Hips", "Quads", "Core"])
                .with_seconds(45)
                .with_plane("sagittal")
                .entered_from(["high-lunge-r"]),
            Pose::new("high_lunge_r")
                .with_slug("high-lunge-r")
                .with_names("High Lunge (Right)", "Anjaneyasana")
                .with_level("intermediate")
                .with_family(Family::Standing)
                .with_intensity(3)
                .with_focus(["Hips", "Quads"])
                .with_seconds(45)
                .with_plane("sagittal")
                .leads_to(["warrior1-r", "twist-low"]),
            Pose::new("twist_low")
                .with_slug("twist-low")
                .with_names("Revolved Low Lunge", "Parivrtta Anjaneyasana")
                .with_level("intermediate")
                .with_family(Family::Twist)
                .with_intensity(4)
                .with_focus(["Spine", "Hips", "Core"])
                .with_seconds(40)
                .with_plane("transverse")
                .entered_from(["high-lunge-r"]),
            Pose::new("bridge")
                .with_names("Bridge Pose", "Setu Bandha Sarvangasana")
                .with_level("beginner")
                .with_family(Family::Backbend)
                .with_intensity(2)
                .with_focus(["Spine", "Glutes"])
                .with_seconds(60)
                .with_plane("sagittal")
                .leads_to(["child"]),
            Pose::new("pigeon")
                .with_names("Sleeping Pigeon", "Eka Pada Rajakapotasana (prep)")
                .with_level("intermediate")
                .with_family(Family::HipOpener)
                .with_intensity(2)
                .with_focus(["Hips", "Glutes"])
                .with_seconds(60)
                .with_plane("frontal")
                .leads_to(["child"]),
            Pose::new("boat")
                .with_names("Boat Pose", "Navasana")
                .with_level("intermediate")
                .with_family(Family::Core)
                .with_intensity(4)
                .with_focus(["Core", "Hip Flexors"])
                .with_seconds(40)
                .with_plane("sagittal"),
            Pose::new("child")
                .with_names("Child's Pose", "Balasana")
                .with_level("beginner")
                .with_family(Family::Restorative)
                .with_intensity(1)
                .with_focus(["Spine", "Hips"])
                .with_seconds(75)
                .with_plane("sagittal")
                .leads_to(["down-dog"]),
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/store.rs"]
mod tests;
