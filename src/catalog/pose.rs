use crate::foundation::core::PoseId;

/// Fallback duration for poses the catalog does not know.
pub const DEFAULT_POSE_SECONDS: u32 = 45;

fn default_pose_seconds() -> u32 {
    DEFAULT_POSE_SECONDS
}

/// Coarse biomechanical grouping of a pose.
///
/// Catalog strings are normalized case-insensitively; anything containing `twist` or
/// `backbend` lands in those families so free-form labels such as `"Seated Twist"`
/// still trigger the safety rules.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Family {
    /// Standing work (warriors, lunges).
    Standing,
    /// Forward folds.
    ForwardFold,
    /// Spinal rotation.
    Twist,
    /// Spinal extension.
    Backbend,
    /// Inversions, including inversion-lite such as down dog.
    Inversion,
    /// Seated poses.
    Seated,
    /// Hip openers.
    HipOpener,
    /// Core strength.
    Core,
    /// Arm balances.
    ArmBalance,
    /// Rest and restorative poses.
    Restorative,
    /// Any other label, normalized to snake_case.
    Other(String),
}

impl Family {
    /// Normalize a free-form catalog label.
    pub fn parse(label: &str) -> Self {
        let norm: String = label
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();

        if norm.contains("twist") {
            return Self::Twist;
        }
        if norm.contains("backbend") {
            return Self::Backbend;
        }
        match norm.as_str() {
            "standing" => Self::Standing,
            "forward_fold" | "fold" => Self::ForwardFold,
            "inversion" => Self::Inversion,
            "seated" => Self::Seated,
            "hip_opener" => Self::HipOpener,
            "core" => Self::Core,
            "arm_balance" => Self::ArmBalance,
            "restorative" | "rest" => Self::Restorative,
            _ => Self::Other(norm),
        }
    }

    /// Canonical snake_case label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standing => "standing",
            Self::ForwardFold => "forward_fold",
            Self::Twist => "twist",
            Self::Backbend => "backbend",
            Self::Inversion => "inversion",
            Self::Seated => "seated",
            Self::HipOpener => "hip_opener",
            Self::Core => "core",
            Self::ArmBalance => "arm_balance",
            Self::Restorative => "restorative",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for Family {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Family {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Family> for String {
    fn from(value: Family) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable catalog record for one posture.
///
/// Optional fields model partially-described poses: scoring treats a missing family or
/// intensity as contributing nothing rather than as an error.
///
/// Deserialization accepts snake_case and camelCase field names. A record may carry both
/// `family` and `category`; `family` wins and `category` fills in when it is missing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "PoseRecord")]
pub struct Pose {
    /// Stable identifier.
    pub id: PoseId,
    /// Cross-reference key used by transition hints.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Sanskrit name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sanskrit: String,
    /// Biomechanical family.
    pub family: Option<Family>,
    /// Experience level such as `beginner`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Effort level, 1 (gentle) to 5 (peak).
    pub intensity: Option<u8>,
    /// Body-area tags such as `Hips` or `Core`.
    pub focus_groups: Vec<String>,
    /// Hold time used when no override is set.
    pub default_seconds: u32,
    /// Plane of movement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plane: Option<String>,
    /// Slugs this pose naturally leads into.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transitions_out: Vec<String>,
    /// Slugs that naturally lead into this pose.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transitions_in: Vec<String>,
    /// Slug of the mirrored pose for one-sided postures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_side_slug: Option<String>,
}

/// Wire shape of a catalog record.
#[derive(serde::Deserialize)]
struct PoseRecord {
    id: PoseId,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sanskrit: String,
    #[serde(default)]
    family: Option<Family>,
    #[serde(default)]
    category: Option<Family>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    intensity: Option<u8>,
    #[serde(default, alias = "focusGroups", alias = "groups")]
    focus_groups: Vec<String>,
    #[serde(
        default = "default_pose_seconds",
        alias = "defaultDurationSeconds",
        alias = "default_duration_seconds",
        alias = "defaultSeconds"
    )]
    default_seconds: u32,
    #[serde(default)]
    plane: Option<String>,
    #[serde(default, alias = "transitionsOut")]
    transitions_out: Vec<String>,
    #[serde(default, alias = "transitionsIn")]
    transitions_in: Vec<String>,
    #[serde(default, alias = "otherSideSlug")]
    other_side_slug: Option<String>,
}

impl From<PoseRecord> for Pose {
    fn from(r: PoseRecord) -> Self {
        Self {
            id: r.id,
            slug: r.slug,
            name: r.name,
            sanskrit: r.sanskrit,
            family: r.family.or(r.category),
            level: r.level,
            intensity: r.intensity,
            focus_groups: r.focus_groups,
            default_seconds: r.default_seconds,
            plane: r.plane,
            transitions_out: r.transitions_out,
            transitions_in: r.transitions_in,
            other_side_slug: r.other_side_slug,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            id: PoseId::default(),
            slug: String::new(),
            name: String::new(),
            sanskrit: String::new(),
            family: None,
            level: None,
            intensity: None,
            focus_groups: Vec::new(),
            default_seconds: DEFAULT_POSE_SECONDS,
            plane: None,
            transitions_out: Vec::new(),
            transitions_in: Vec::new(),
            other_side_slug: None,
        }
    }
}

impl Pose {
    /// Start a pose record with only an id. The slug defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self {
            slug: id.clone(),
            id: PoseId(id),
            ..Self::default()
        }
    }

    /// Set the slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Set the display and Sanskrit names.
    pub fn with_names(mut self, name: impl Into<String>, sanskrit: impl Into<String>) -> Self {
        self.name = name.into();
        self.sanskrit = sanskrit.into();
        self
    }

    /// Set the family.
    pub fn with_family(mut self, family: impl Into<Family>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Set the experience level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Set the slug of the mirrored pose.
    pub fn with_other_side(mut self, slug: impl Into<String>) -> Self {
        self.other_side_slug = Some(slug.into());
        self
    }

    /// Set the intensity.
    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Set the focus groups.
    pub fn with_focus<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default hold time.
    pub fn with_seconds(mut self, seconds: u32) -> Self {
        self.default_seconds = seconds;
        self
    }

    /// Set the plane of movement.
    pub fn with_plane(mut self, plane: impl Into<String>) -> Self {
        self.plane = Some(plane.into());
        self
    }

    /// Declare slugs this pose flows into.
    pub fn leads_to<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transitions_out = slugs.into_iter().map(Into::into).collect();
        self
    }

    /// Declare slugs that flow into this pose.
    pub fn entered_from<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transitions_in = slugs.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this pose carries the given focus tag (case-insensitive).
    pub fn has_focus(&self, focus: &str) -> bool {
        self.focus_groups
            .iter()
            .any(|g| g.eq_ignore_ascii_case(focus))
    }

    /// Whether the catalog author declared `self -> next` a natural transition, from
    /// either side.
    pub fn declares_transition_to(&self, next: &Pose) -> bool {
        let out = !next.slug.is_empty() && self.transitions_out.iter().any(|s| *s == next.slug);
        let inn = !self.slug.is_empty() && next.transitions_in.iter().any(|s| *s == self.slug);
        out || inn
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/pose.rs"]
mod tests;
