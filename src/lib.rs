//! Yogaflow is a sequencing and timing engine for yoga flows.
//!
//! It orders poses into a flow that respects a small set of biomechanical safety rules,
//! scores and suggests transitions between poses, generates whole flows from a length,
//! intensity and focus, and keeps per-pose durations consistent while a flow is edited
//! and played back.
//!
//! # Building blocks
//!
//! 1. **Catalog**: a read-only [`PoseCatalog`] of [`Pose`] records, built in or loaded from JSON
//! 2. **Safety**: [`apply_safety_adjustments`] repairs a sequence against [`SafetyRules`]
//! 3. **Transitions**: [`score()`], [`next_pose_suggestions`], [`suggest_transition_pose`]
//! 4. **Generation**: [`generate()`] builds a repaired flow from a [`GenerateRequest`]
//! 5. **Timing**: [`DurationOverrides`], [`pose_durations`], [`SessionPlan`] and [`PlaybackState`]
//!
//! Every sequencing and timing operation is pure, synchronous and fail-soft: unknown pose
//! ids, missing metadata and out-of-range numbers degrade to documented defaults instead
//! of errors. [`FlowError`] only appears while loading catalogs and configuration.
//!
//! Randomness is always injected through [`RandomSource`]; [`Rng64`] is a seedable default.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod config;
mod foundation;
mod generate;
mod safety;
mod timing;
mod transition;

pub use crate::catalog::pose::{DEFAULT_POSE_SECONDS, Family, Pose};
pub use crate::catalog::store::PoseCatalog;
pub use crate::config::EngineConfig;
pub use crate::foundation::core::{PoseId, Sequence, Tempo, sequence_of};
pub use crate::foundation::error::{FlowError, FlowResult};
pub use crate::foundation::rng::{RandomSource, Rng64};
pub use crate::generate::generator::{
    Focus, GenerateRequest, GeneratorConfig, generate, pool_weights, reshuffle, target_count,
    weighted_pick,
};
pub use crate::safety::adjust::{CoachTip, apply_safety_adjustments, coach_tip, is_safety_stable};
pub use crate::safety::rules::SafetyRules;
pub use crate::timing::durations::{
    TimingConfig, TimingMode, apply_overrides, base_durations, override_from_input,
    pose_durations, quantize_to_breaths, tempo_adjust,
};
pub use crate::timing::overrides::DurationOverrides;
pub use crate::timing::session::{
    Phase, PlaybackState, SessionEvent, SessionPlan, compute_total_remaining,
};
pub use crate::transition::score::{ScoreWeights, score};
pub use crate::transition::suggest::{
    BILATERAL_SCORE, COUNTER_POSE_BOOST, NEUTRAL_BRIDGE_FAMILIES, NEXT_SUGGESTION_LIMIT,
    PALETTE_LIMIT, Scorer, next_pose_suggestions, select_best_transition_poses,
    starting_pose_suggestions, suggest_transition_pose, suggestion_palette,
};
