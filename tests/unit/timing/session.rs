use super::*;
use crate::foundation::core::sequence_of;

fn plan(durations: &[u32], transition_seconds: u32, cooldown_seconds: u32) -> SessionPlan {
    SessionPlan {
        durations: durations.to_vec(),
        transition_seconds,
        cooldown_seconds,
    }
}

#[test]
fn total_remaining_mid_session() {
    assert_eq!(
        compute_total_remaining(0, 30.0, &[60, 45, 40], 5.0, 3, 120.0, false),
        245
    );
    assert_eq!(
        compute_total_remaining(1, 10.0, &[60, 45, 45], 5.0, 4, 120.0, false),
        185
    );
}

#[test]
fn total_remaining_in_cooldown_is_what_is_left() {
    assert_eq!(
        compute_total_remaining(2, 100.0, &[60, 45, 40], 5.0, 3, 120.0, true),
        100
    );
}

#[test]
fn total_remaining_never_negative() {
    assert_eq!(
        compute_total_remaining(9, -50.0, &[60], -5.0, 1, -120.0, false),
        0
    );
    assert_eq!(
        compute_total_remaining(0, f64::NAN, &[], f64::INFINITY, 0, f64::NAN, false),
        0
    );
    assert_eq!(
        compute_total_remaining(usize::MAX, 1.5, &[60], 5.0, 1, 0.0, false),
        1
    );
}

#[test]
fn plan_total_counts_gaps_and_cooldown() {
    assert_eq!(plan(&[60, 45, 40], 5, 120).total_seconds(), 275);
    assert_eq!(plan(&[60], 5, 0).total_seconds(), 60);
    assert_eq!(plan(&[], 5, 120).total_seconds(), 120);
}

#[test]
fn plan_from_flow_uses_timing_config() {
    let catalog = PoseCatalog::builtin();
    let seq = sequence_of(["child", "boat"]);
    let overrides = DurationOverrides::from([(1, 30.0)]);
    let p = SessionPlan::from_flow(&catalog, &seq, &overrides, &TimingConfig::default());
    assert_eq!(p, plan(&[75, 30], 5, 120));
}

#[test]
fn remaining_at_start_equals_plan_total() {
    let p = plan(&[60, 45, 40], 5, 120);
    let state = PlaybackState::start(&p);
    assert_eq!(state.remaining_total(&p), p.total_seconds());
}

#[test]
fn ticks_walk_poses_then_cooldown() {
    let p = plan(&[3, 2], 5, 2);
    let mut state = PlaybackState::start(&p);
    let mut events = Vec::new();
    for _ in 0..10 {
        let (next, event) = state.advance_tick(&p);
        events.extend(event);
        state = next;
    }
    assert_eq!(
        events,
        vec![
            SessionEvent::PoseStarted { index: 1 },
            SessionEvent::CooldownStarted,
            SessionEvent::Completed,
        ]
    );
    assert_eq!(state.phase, Phase::Done);
    assert_eq!(state.remaining_total(&p), 0);
}

#[test]
fn remaining_total_counts_down_each_tick() {
    let p = plan(&[3, 2], 5, 2);
    let mut state = PlaybackState::start(&p);
    let mut seen = vec![state.remaining_total(&p)];
    while state.phase != Phase::Done {
        state = state.advance_tick(&p).0;
        seen.push(state.remaining_total(&p));
    }
    assert_eq!(seen.first(), Some(&12));
    assert!(seen.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(seen.last(), Some(&0));
}

#[test]
fn no_cooldown_completes_after_last_pose() {
    let p = plan(&[1], 5, 0);
    let (state, event) = PlaybackState::start(&p).advance_tick(&p);
    assert_eq!(event, Some(SessionEvent::Completed));
    assert_eq!(state.phase, Phase::Done);
}

#[test]
fn empty_plan_starts_in_cooldown() {
    let p = plan(&[], 5, 30);
    let state = PlaybackState::start(&p);
    assert_eq!(state.phase, Phase::Cooldown);
    assert_eq!(state.remaining, 30);
    assert_eq!(PlaybackState::start(&plan(&[], 5, 0)).phase, Phase::Done);
}

#[test]
fn skipping_clamps_to_flow_and_resets_pose_time() {
    let p = plan(&[60, 45, 40], 5, 120);
    let state = PlaybackState::start(&p).skip_previous(&p);
    assert_eq!((state.index, state.remaining), (0, 60));

    let state = state.skip_next(&p).skip_next(&p).skip_next(&p);
    assert_eq!((state.index, state.remaining), (2, 40));
    assert_eq!(state.skip_previous(&p).remaining, 45);
}

#[test]
fn skipping_is_ignored_in_cooldown() {
    let p = plan(&[60], 5, 120);
    let cooling = PlaybackState {
        index: 0,
        remaining: 80,
        phase: Phase::Cooldown,
    };
    assert_eq!(cooling.skip_next(&p), cooling);
    assert_eq!(cooling.skip_previous(&p), cooling);
}

#[test]
fn fit_to_plan_caps_current_pose() {
    let slow = plan(&[60, 45], 5, 120);
    let fast = plan(&[30, 23], 5, 120);
    let state = PlaybackState::start(&slow).fit_to_plan(&fast);
    assert_eq!(state.remaining, 30);
    assert_eq!(state.fit_to_plan(&slow).remaining, 30);
}

#[test]
fn events_serialize_with_tag() {
    let v = serde_json::to_value(SessionEvent::PoseStarted { index: 2 }).unwrap();
    assert_eq!(v, serde_json::json!({ "event": "pose_started", "index": 2 }));
}
