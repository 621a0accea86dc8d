/// Stable pose identifier shared by the catalog, sequences and the UI.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct PoseId(pub String);

impl PoseId {
    /// Build an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PoseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PoseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PoseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered list of pose ids. Positions carry no identity beyond their index.
pub type Sequence = Vec<PoseId>;

/// Build a [`Sequence`] from string ids.
pub fn sequence_of<I, S>(ids: I) -> Sequence
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(|s| PoseId(s.into())).collect()
}

/// Playback speed multiplier, clamped to `[Tempo::MIN, Tempo::MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Tempo(f64);

impl Tempo {
    /// Slowest supported tempo.
    pub const MIN: f64 = 0.25;
    /// Fastest supported tempo.
    pub const MAX: f64 = 4.0;

    /// Clamp `factor` into the supported range. Non-finite input maps to 1x.
    pub fn new(factor: f64) -> Self {
        if !factor.is_finite() {
            return Self(1.0);
        }
        Self(factor.clamp(Self::MIN, Self::MAX))
    }

    /// The clamped multiplier.
    pub fn factor(self) -> f64 {
        self.0
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f64> for Tempo {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Tempo> for f64 {
    fn from(value: Tempo) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
