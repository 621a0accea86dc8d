use super::*;

fn id(s: &str) -> PoseId {
    PoseId::new(s)
}

#[test]
fn twist_backbend_is_unsafe_both_directions() {
    let rules = SafetyRules::default();
    assert!(rules.is_unsafe_pair(&Family::Twist, &Family::Backbend));
    assert!(rules.is_unsafe_pair(&Family::Backbend, &Family::Twist));
    assert!(!rules.is_unsafe_pair(&Family::Twist, &Family::Twist));
    assert!(!rules.is_unsafe_pair(&Family::Twist, &Family::Restorative));
}

#[test]
fn id_level_check_uses_catalog_families() {
    let rules = SafetyRules::default();
    let catalog = PoseCatalog::builtin();
    assert!(rules.is_unsafe_adjacent(&catalog, &id("twist_low"), &id("bridge")));
    assert!(rules.is_unsafe_adjacent(&catalog, &id("bridge"), &id("twist_low")));
    assert!(!rules.is_unsafe_adjacent(&catalog, &id("twist_low"), &id("child")));
}

#[test]
fn missing_poses_are_never_unsafe() {
    let rules = SafetyRules::default();
    let catalog = PoseCatalog::builtin();
    assert!(!rules.is_unsafe_adjacent(&catalog, &id("ghost"), &id("bridge")));
    assert!(!rules.is_unsafe_transition(None, None));
    let twist = Pose::new("t").with_family(Family::Twist);
    assert!(!rules.is_unsafe_transition(Some(&twist), None));
    assert!(!rules.is_unsafe_transition(Some(&twist), Some(&Pose::default())));
}

#[test]
fn counter_poses_prefer_forward_fold() {
    let rules = SafetyRules::default();
    let catalog = PoseCatalog::builtin();
    let counters = rules.requires_counter_pose(&catalog, &id("bridge"));
    assert_eq!(counters, &[id("forward_fold"), id("child")]);
    assert!(rules.requires_counter_pose(&catalog, &id("down_dog")).is_empty());
    assert!(rules.requires_counter_pose(&catalog, &id("ghost")).is_empty());
}

#[test]
fn rule_table_is_extensible_through_json() {
    let rules: SafetyRules = serde_json::from_value(serde_json::json!({
        "unsafe_pairs": [["twist", "backbend"], ["inversion", "arm balance"]],
        "counter_poses": { "inversion": ["child"] }
    }))
    .unwrap();
    assert!(rules.is_unsafe_pair(&Family::ArmBalance, &Family::Inversion));
    assert_eq!(rules.counter_poses_for(&Family::Inversion), &[id("child")]);
    assert!(rules.counter_poses_for(&Family::Twist).is_empty());
    assert_eq!(rules.neutral_pose, id("forward_fold"));
}
