use super::*;
use crate::foundation::core::sequence_of;
use crate::foundation::rng::Rng64;
use crate::safety::adjust::is_safety_stable;

/// Replays a fixed list of draws, cycling when exhausted.
struct Scripted {
    draws: Vec<f64>,
    at: usize,
}

impl Scripted {
    fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.to_vec(),
            at: 0,
        }
    }
}

impl RandomSource for Scripted {
    fn next_f64_01(&mut self) -> f64 {
        let v = self.draws[self.at % self.draws.len()];
        self.at += 1;
        v
    }
}

fn fixture() -> (PoseCatalog, SafetyRules, GeneratorConfig) {
    (
        PoseCatalog::builtin(),
        SafetyRules::default(),
        GeneratorConfig::default(),
    )
}

#[test]
fn target_count_rounds_and_floors() {
    let cfg = GeneratorConfig::default();
    assert_eq!(target_count(&cfg, 0.0), 6);
    assert_eq!(target_count(&cfg, 7.0), 9);
    assert_eq!(target_count(&cfg, 15.0), 20);
    assert_eq!(target_count(&cfg, 45.0), 60);
    assert_eq!(target_count(&cfg, -3.0), 6);
    assert_eq!(target_count(&cfg, f64::NAN), 6);
}

#[test]
fn target_count_is_capped() {
    let cfg = GeneratorConfig::default();
    assert_eq!(target_count(&cfg, 1e12), cfg.max_poses);
    assert_eq!(target_count(&cfg, f64::MAX), cfg.max_poses);

    let tight = GeneratorConfig {
        min_poses: 6,
        max_poses: 10,
        ..GeneratorConfig::default()
    };
    assert_eq!(target_count(&tight, 60.0), 10);
    let inverted = GeneratorConfig {
        max_poses: 2,
        ..GeneratorConfig::default()
    };
    assert_eq!(target_count(&inverted, 60.0), 6);
}

#[test]
fn focus_parses_loosely() {
    assert_eq!("Full-Body".parse::<Focus>().unwrap(), Focus::FullBody);
    assert_eq!("full_body".parse::<Focus>().unwrap(), Focus::FullBody);
    assert_eq!("HIPS".parse::<Focus>().unwrap(), Focus::Hips);
    assert!("elbows".parse::<Focus>().is_err());
    assert_eq!(serde_json::to_string(&Focus::FullBody).unwrap(), "\"Full-Body\"");
}

#[test]
fn pool_weights_honor_focus_and_intensity() {
    let (catalog, _, cfg) = fixture();
    let req = GenerateRequest::new(30.0, 1, Focus::Hips);
    assert_eq!(
        pool_weights(&catalog, &cfg, &req),
        vec![1.0, 1.0, 1.0, 0.5, 1.0, 2.0, 0.5, 1.0]
    );
}

#[test]
fn unit_off_intensity_factor_reproduces_focus_only_weights() {
    let (catalog, _, cfg) = fixture();
    let cfg = GeneratorConfig {
        off_intensity_factor: 1.0,
        ..cfg
    };
    let req = GenerateRequest::new(30.0, 1, Focus::Hips);
    assert_eq!(
        pool_weights(&catalog, &cfg, &req),
        vec![2.0, 2.0, 2.0, 1.0, 1.0, 2.0, 1.0, 1.0]
    );
}

#[test]
fn unknown_pool_entries_weigh_one() {
    let (catalog, _, cfg) = fixture();
    let cfg = GeneratorConfig {
        pool: sequence_of(["ghost"]),
        ..cfg
    };
    let req = GenerateRequest::new(30.0, 3, Focus::Core);
    assert_eq!(pool_weights(&catalog, &cfg, &req), vec![1.0]);
}

#[test]
fn weighted_pick_walks_the_wheel() {
    let weights = [0.0, 1.0, 0.0, 3.0];
    assert_eq!(weighted_pick(&weights, &mut Scripted::new(&[0.0])), Some(1));
    assert_eq!(weighted_pick(&weights, &mut Scripted::new(&[0.5])), Some(3));
    assert_eq!(weighted_pick(&weights, &mut Scripted::new(&[0.999])), Some(3));
    assert_eq!(weighted_pick(&[0.0, 0.0], &mut Scripted::new(&[0.5])), None);
    assert_eq!(weighted_pick(&[], &mut Scripted::new(&[0.5])), None);
}

#[test]
fn zero_minutes_truncates_template_to_floor() {
    let (catalog, rules, cfg) = fixture();
    let req = GenerateRequest::new(0.0, 3, Focus::FullBody);
    let out = generate(&catalog, &rules, &cfg, &req, &mut Scripted::new(&[0.0]));
    assert_eq!(
        out,
        sequence_of([
            "child",
            "down_dog",
            "forward_fold",
            "high_lunge_r",
            "warrior1_r",
            "down_dog"
        ])
    );
}

#[test]
fn scripted_draw_appends_exact_pose() {
    let (catalog, rules, cfg) = fixture();
    let req = GenerateRequest::new(7.0, 3, Focus::FullBody);
    let out = generate(&catalog, &rules, &cfg, &req, &mut Scripted::new(&[0.0]));
    let mut expected = cfg.template.clone();
    expected.push(PoseId::new("warrior1_r"));
    assert_eq!(out, expected);
}

#[test]
fn truncation_restores_trailing_counter_pose() {
    let (catalog, rules, cfg) = fixture();
    let req = GenerateRequest::new(7.0, 3, Focus::FullBody);
    // 0.3 of a uniform 8-way wheel lands on twist_low.
    let out = generate(&catalog, &rules, &cfg, &req, &mut Scripted::new(&[0.3]));

    assert_eq!(out.len(), target_count(&cfg, 7.0) + 1);
    assert_eq!(out[out.len() - 2].as_str(), "twist_low");
    assert_eq!(out[out.len() - 1].as_str(), "forward_fold");
    assert!(is_safety_stable(&catalog, &rules, &out));
}

#[test]
fn empty_pool_stops_early_with_template() {
    let (catalog, rules, cfg) = fixture();
    let cfg = GeneratorConfig {
        pool: Vec::new(),
        ..cfg
    };
    let req = GenerateRequest::new(30.0, 3, Focus::FullBody);
    let out = generate(&catalog, &rules, &cfg, &req, &mut Rng64::new(1));
    assert_eq!(out, cfg.template);
}

#[test]
fn same_seed_same_flow() {
    let (catalog, rules, cfg) = fixture();
    let req = GenerateRequest::new(30.0, 3, Focus::Core);
    let a = generate(&catalog, &rules, &cfg, &req, &mut Rng64::new(77));
    let b = generate(&catalog, &rules, &cfg, &req, &mut Rng64::new(77));
    assert_eq!(a, b);
}

#[test]
fn generated_flows_meet_floor_and_are_safety_stable() {
    let (catalog, rules, cfg) = fixture();
    let foci = [
        Focus::FullBody,
        Focus::Hips,
        Focus::Core,
        Focus::Spine,
        Focus::Balance,
    ];
    for seed in 0..40u64 {
        for (k, minutes) in [0.0, 2.5, 5.0, 15.0, 30.0, 60.0, 90.0].into_iter().enumerate() {
            let req = GenerateRequest::new(minutes, (seed % 5) as u8 + 1, foci[k % foci.len()]);
            let out = generate(&catalog, &rules, &cfg, &req, &mut Rng64::new(seed));
            let target = target_count(&cfg, minutes);
            assert!(out.len() >= 6);
            assert!(out.len() <= target + 1, "len {} target {target}", out.len());
            assert!(is_safety_stable(&catalog, &rules, &out), "seed {seed} minutes {minutes}");
        }
    }
}

#[test]
fn reshuffle_keeps_poses_and_repairs() {
    let (catalog, rules, _) = fixture();
    let flow = sequence_of(["child", "twist_low", "down_dog", "bridge", "boat"]);
    let out = reshuffle(&catalog, &rules, &flow, &mut Rng64::new(4));
    for id in &flow {
        assert!(out.contains(id));
    }
    assert!(is_safety_stable(&catalog, &rules, &out));
}
