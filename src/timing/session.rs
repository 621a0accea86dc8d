use crate::{
    catalog::{pose::DEFAULT_POSE_SECONDS, store::PoseCatalog},
    foundation::core::PoseId,
    timing::{
        durations::{TimingConfig, pose_durations},
        overrides::DurationOverrides,
    },
};

/// Seconds left in a session.
///
/// Sums the time left in the current pose, the durations of poses not yet started
/// (`durations[current_index + 1..]`), one `transition_seconds` gap per remaining pose
/// boundary and the cooldown when it has not begun. Once `in_cooldown` is set only
/// `remaining_in_current` counts. Negative or non-finite inputs count as zero, so the
/// result is never negative.
pub fn compute_total_remaining(
    current_index: usize,
    remaining_in_current: f64,
    durations: &[u32],
    transition_seconds: f64,
    flow_len: usize,
    cooldown_seconds: f64,
    in_cooldown: bool,
) -> u64 {
    let current = non_negative(remaining_in_current);
    if in_cooldown {
        return current.floor() as u64;
    }
    let tail: u64 = durations
        .iter()
        .skip(current_index.saturating_add(1))
        .map(|&d| u64::from(d))
        .sum();
    let gaps = flow_len.saturating_sub(1).saturating_sub(current_index);
    let transitions = gaps as f64 * non_negative(transition_seconds);
    (current + tail as f64 + transitions + non_negative(cooldown_seconds)).floor() as u64
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Resolved timing for one practice session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionPlan {
    /// Effective seconds per pose, in flow order.
    pub durations: Vec<u32>,
    /// Gap between consecutive poses.
    pub transition_seconds: u32,
    /// Closing rest length. Zero skips the cooldown.
    pub cooldown_seconds: u32,
}

impl SessionPlan {
    /// Plan `seq` with `overrides` under `config`.
    #[tracing::instrument(skip_all, fields(poses = seq.len()))]
    pub fn from_flow(
        catalog: &PoseCatalog,
        seq: &[PoseId],
        overrides: &DurationOverrides,
        config: &TimingConfig,
    ) -> Self {
        Self {
            durations: pose_durations(catalog, seq, overrides, config),
            transition_seconds: config.transition_seconds,
            cooldown_seconds: config.cooldown_seconds,
        }
    }

    /// Number of poses.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Return `true` for a plan without poses.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Whole-session length: poses, the gaps between them and the cooldown.
    pub fn total_seconds(&self) -> u64 {
        let poses: u64 = self.durations.iter().map(|&d| u64::from(d)).sum();
        let gaps = self.len().saturating_sub(1) as u64;
        poses + gaps * u64::from(self.transition_seconds) + u64::from(self.cooldown_seconds)
    }

    fn duration_at(&self, index: usize) -> u32 {
        self.durations
            .get(index)
            .copied()
            .unwrap_or(DEFAULT_POSE_SECONDS)
    }
}

/// Where playback currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Holding the pose at `PlaybackState::index`.
    Pose,
    /// Closing rest.
    Cooldown,
    /// Session over.
    Done,
}

/// Something playback reached on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The pose at `index` began.
    PoseStarted {
        /// Flow position.
        index: usize,
    },
    /// The last pose ended and the closing rest began.
    CooldownStarted,
    /// Nothing left to play.
    Completed,
}

/// Player position, advanced once per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackState {
    /// Current flow position.
    pub index: usize,
    /// Seconds left in the current pose or cooldown.
    pub remaining: u32,
    /// Current phase.
    pub phase: Phase,
}

impl PlaybackState {
    /// State at the first pose of `plan`. An empty plan starts in cooldown, or is done
    /// straight away without one.
    pub fn start(plan: &SessionPlan) -> Self {
        if plan.is_empty() {
            return Self::after_last_pose(plan, 0).0;
        }
        Self {
            index: 0,
            remaining: plan.duration_at(0),
            phase: Phase::Pose,
        }
    }

    fn after_last_pose(plan: &SessionPlan, index: usize) -> (Self, SessionEvent) {
        if plan.cooldown_seconds > 0 {
            let state = Self {
                index,
                remaining: plan.cooldown_seconds,
                phase: Phase::Cooldown,
            };
            (state, SessionEvent::CooldownStarted)
        } else {
            let state = Self {
                index,
                remaining: 0,
                phase: Phase::Done,
            };
            (state, SessionEvent::Completed)
        }
    }

    /// One second of playback.
    pub fn advance_tick(self, plan: &SessionPlan) -> (Self, Option<SessionEvent>) {
        match self.phase {
            Phase::Done => (self, None),
            _ if self.remaining > 1 => (
                Self {
                    remaining: self.remaining - 1,
                    ..self
                },
                None,
            ),
            Phase::Cooldown => {
                tracing::debug!("session complete");
                let state = Self {
                    remaining: 0,
                    phase: Phase::Done,
                    ..self
                };
                (state, Some(SessionEvent::Completed))
            }
            Phase::Pose => {
                let next = self.index + 1;
                if next < plan.len() {
                    let state = Self {
                        index: next,
                        remaining: plan.duration_at(next),
                        phase: Phase::Pose,
                    };
                    (state, Some(SessionEvent::PoseStarted { index: next }))
                } else {
                    let (state, event) = Self::after_last_pose(plan, self.index);
                    tracing::debug!(?event, "last pose finished");
                    (state, Some(event))
                }
            }
        }
    }

    /// Jump to the next pose, staying on the last one. Only moves while holding a pose.
    pub fn skip_next(self, plan: &SessionPlan) -> Self {
        if self.phase != Phase::Pose || plan.is_empty() {
            return self;
        }
        let index = (self.index + 1).min(plan.len() - 1);
        Self {
            index,
            remaining: plan.duration_at(index),
            phase: Phase::Pose,
        }
    }

    /// Jump to the previous pose, staying on the first one. Only moves while holding a pose.
    pub fn skip_previous(self, plan: &SessionPlan) -> Self {
        if self.phase != Phase::Pose || plan.is_empty() {
            return self;
        }
        let index = self.index.saturating_sub(1);
        Self {
            index,
            remaining: plan.duration_at(index),
            phase: Phase::Pose,
        }
    }

    /// Cap the time left in the current pose after `plan` changed, e.g. on a tempo change.
    pub fn fit_to_plan(self, plan: &SessionPlan) -> Self {
        if self.phase != Phase::Pose {
            return self;
        }
        Self {
            remaining: self.remaining.min(plan.duration_at(self.index)),
            ..self
        }
    }

    /// Seconds left in the whole session.
    pub fn remaining_total(&self, plan: &SessionPlan) -> u64 {
        if self.phase == Phase::Done {
            return 0;
        }
        compute_total_remaining(
            self.index,
            f64::from(self.remaining),
            &plan.durations,
            f64::from(plan.transition_seconds),
            plan.len(),
            f64::from(plan.cooldown_seconds),
            self.phase == Phase::Cooldown,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/session.rs"]
mod tests;
