// Property-style checks of the buffer sizing contract over seeded inputs.

use backdrop_core::constants::{MAX_RESOLUTION_SCALE, MIN_RESOLUTION_SCALE};
use backdrop_core::{DisplaySize, ResizeOutcome, SurfaceManager};
use rand::prelude::*;

#[test]
fn buffer_is_at_least_one_pixel_for_any_input() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut s = SurfaceManager::new();
    for _ in 0..10_000 {
        let display = DisplaySize::new(rng.gen_range(-50.0..4000.0), rng.gen_range(-50.0..4000.0));
        let scale = rng.gen_range(-2.0..12.0);
        let dpr = rng.gen_range(0.0..4.0);
        s.configure(display, scale, dpr, rng.gen_bool(0.5));
        let b = s.buffer_size();
        assert!(b.width >= 1 && b.height >= 1);
        let k = s.resolution_scale();
        assert!((MIN_RESOLUTION_SCALE..=MAX_RESOLUTION_SCALE).contains(&k));
        assert_eq!(b.width, ((display.width * k).floor() as u32).max(1));
    }
}

#[test]
fn single_shot_resizes_never_apply_on_their_own() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut s = SurfaceManager::new();
    s.configure(DisplaySize::new(10.0, 10.0), 1.0, 1.0, true);
    if let Some(first) = s.pending_resize() {
        s.mark_applied(first);
    }
    let applied = s.applied_buffer_size();
    for _ in 0..1000 {
        let out = s.resize(DisplaySize::new(rng.gen_range(0.0..900.0), rng.gen_range(0.0..900.0)));
        assert!(!matches!(out, ResizeOutcome::Applied(_)));
        assert_eq!(s.applied_buffer_size(), applied);
    }
    let last = s.buffer_size();
    match s.pending_resize() {
        Some(size) => {
            assert_eq!(size, last);
            s.mark_applied(size);
        }
        None => assert_eq!(Some(last), applied),
    }
    assert_eq!(s.pending_resize(), None);
}
