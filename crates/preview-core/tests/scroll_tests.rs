// Host-side tests for scroll smoothing as the coordinator drives it.

use preview_core::constants::SCROLL_SETTLE_EPSILON;
use preview_core::scroll::{ScrollCell, ScrollSmoother};

const FRAME: f32 = 1.0 / 60.0;

#[test]
fn step_input_converges_without_overshoot() {
    for target in [120.0_f32, 800.0, 2400.0] {
        let mut smoother = ScrollSmoother::new(10_000.0);
        let cell = ScrollCell::new();
        smoother.scroll_to(target);

        let mut last = 0.0;
        for _ in 0..240 {
            let v = smoother.advance(FRAME);
            cell.set(v);
            assert!(v >= last, "went backwards at {v}");
            assert!(v <= target + SCROLL_SETTLE_EPSILON, "overshot {target}: {v}");
            last = v;
        }
        assert_eq!(cell.get(), target);
        assert!(!smoother.is_animating());
    }
}

#[test]
fn upward_step_converges_from_above() {
    let mut smoother = ScrollSmoother::new(5000.0);
    smoother.sync_native(3000.0);
    smoother.scroll_to(0.0);
    let mut last = 3000.0;
    for _ in 0..240 {
        let v = smoother.advance(FRAME);
        assert!(v <= last && v >= -SCROLL_SETTLE_EPSILON);
        last = v;
    }
    assert_eq!(smoother.current(), 0.0);
}

#[test]
fn wheel_burst_settles_on_accumulated_target() {
    let mut smoother = ScrollSmoother::new(10_000.0);
    for _ in 0..10 {
        smoother.wheel(100.0);
        smoother.advance(FRAME);
    }
    let target = smoother.target();
    assert!((target - 900.0).abs() < 1e-3);
    for _ in 0..240 {
        smoother.advance(FRAME);
    }
    assert_eq!(smoother.current(), target);
}

#[test]
fn most_of_the_distance_is_covered_early() {
    let mut smoother = ScrollSmoother::new(10_000.0);
    smoother.scroll_to(1000.0);
    // half the duration in
    for _ in 0..45 {
        smoother.advance(FRAME);
    }
    assert!(smoother.current() > 900.0);
    assert!(smoother.is_animating());
}
