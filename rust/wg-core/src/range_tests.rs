use crate::{compute_target_range, decide_target, RangeRules, TargetDecision, TargetRange};

#[test]
fn band_from_start_weights() {
    let r = compute_target_range(&[650, 630, 640], &RangeRules::default());
    assert_eq!(r, TargetRange { min: 550, max: 620 });
    assert!(!r.is_inverted());
    assert!(r.contains(600));
    assert!(r.contains(550));
    assert!(r.contains(620));
    assert!(!r.contains(621));
    assert!(!r.contains(549));
}

#[test]
fn empty_weights_give_zero_band() {
    let r = compute_target_range(&[], &RangeRules::default());
    assert_eq!(r, TargetRange { min: 0, max: 0 });
    assert_eq!(
        decide_target(&[], &RangeRules::default()),
        TargetDecision::Free { range: r }
    );
}

#[test]
fn bounds_clamp_at_zero() {
    let r = compute_target_range(&[60, 5], &RangeRules::default());
    assert_eq!(r, TargetRange { min: 0, max: 0 });
}

#[test]
fn wide_spread_inverts_the_band() {
    // highest - 100 = 600 > lowest - 10 = 490
    let r = compute_target_range(&[700, 500], &RangeRules::default());
    assert_eq!(r, TargetRange { min: 600, max: 490 });
    assert!(r.is_inverted());
    assert!(!r.contains(550));
}

#[test]
fn spread_below_threshold_is_free() {
    let d = decide_target(&[689, 600], &RangeRules::default());
    assert_eq!(
        d,
        TargetDecision::Free {
            range: TargetRange { min: 589, max: 590 }
        }
    );
    assert_eq!(d.auto_target(), None);
}

#[test]
fn spread_at_threshold_auto_assigns_lowest_minus_offset() {
    let d = decide_target(&[690, 600], &RangeRules::default());
    assert_eq!(
        d,
        TargetDecision::AutoAssigned {
            target: 590,
            spread: 90
        }
    );
    assert_eq!(d.auto_target(), Some(590));

    let d = decide_target(&[800, 600, 650], &RangeRules::default());
    assert_eq!(d.auto_target(), Some(590));
}

#[test]
fn inverted_band_auto_assigns_even_under_a_lax_threshold() {
    let rules = RangeRules {
        auto_target_spread: 500,
        ..RangeRules::default()
    };
    let d = decide_target(&[700, 500], &rules);
    assert_eq!(
        d,
        TargetDecision::AutoAssigned {
            target: 490,
            spread: 200
        }
    );
}

#[test]
fn custom_offsets_are_respected() {
    let rules = RangeRules {
        below_lowest: 20,
        below_highest: 60,
        auto_target_spread: 40,
    };
    let r = compute_target_range(&[500, 480], &rules);
    assert_eq!(r, TargetRange { min: 440, max: 460 });
    assert!(matches!(decide_target(&[500, 480], &rules), TargetDecision::Free { .. }));
}

#[test]
fn extreme_weights_saturate_instead_of_overflowing() {
    let rules = RangeRules::default();
    let r = compute_target_range(&[i32::MIN, 100], &rules);
    assert_eq!(r, TargetRange { min: 0, max: 0 });
    assert_eq!(
        decide_target(&[i32::MIN, 100], &rules),
        TargetDecision::AutoAssigned {
            target: 0,
            spread: i32::MAX
        }
    );

    let r = compute_target_range(&[i32::MAX], &rules);
    assert_eq!(
        r,
        TargetRange {
            min: i32::MAX - 100,
            max: i32::MAX - 10
        }
    );
}
