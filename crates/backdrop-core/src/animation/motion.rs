//! Positional motion for animated points.
//!
//! A point either holds its (bounds-clamped) base position or seeks a target
//! along an eased segment. Targets come from a waypoint list or are sampled at
//! random; arriving at a target snaps to it and picks the next one.

use super::easing::Easing;
use crate::constants::{DEFAULT_BOUNDS, DEFAULT_SEGMENT_DURATION_SEC, MIN_SEGMENT_DURATION_SEC};
use glam::Vec2;
use rand::Rng;
use smallvec::SmallVec;
use std::f32::consts::TAU;

pub type Waypoints = SmallVec<[Vec2; 8]>;

/// Axis-aligned rectangle in normalized `[-1, 1]²` space.
///
/// Always satisfies `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl Bounds {
    /// Build bounds from possibly swapped edges. Non-finite edges fall back to
    /// the default rectangle.
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        if ![min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite()) {
            return Self::default();
        }
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }
    pub fn max_x(&self) -> f32 {
        self.max_x
    }
    pub fn min_y(&self) -> f32 {
        self.min_y
    }
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y.clamp(self.min_y, self.max_y),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        let [min_x, max_x, min_y, max_y] = DEFAULT_BOUNDS;
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MotionMode {
    Static,
    Path(Waypoints),
    /// Sample targets inside `bounds`, or within `radius` of the base position
    /// when a positive radius is set.
    Random { radius: Option<f32> },
}

/// Fully resolved motion settings for one point.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionSpec {
    pub mode: MotionMode,
    pub easing: Easing,
    pub duration: f32,
    pub bounds: Bounds,
}

/// Kernel-wide motion settings every point inherits from.
pub type MotionDefaults = MotionSpec;

impl Default for MotionSpec {
    fn default() -> Self {
        Self {
            mode: MotionMode::Static,
            easing: Easing::default(),
            duration: DEFAULT_SEGMENT_DURATION_SEC,
            bounds: Bounds::default(),
        }
    }
}

/// Per-point overrides. `None` fields inherit from [`MotionDefaults`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionOverride {
    pub mode: Option<MotionMode>,
    pub easing: Option<Easing>,
    pub duration: Option<f32>,
    pub bounds: Option<Bounds>,
}

/// Merge a point's overrides with the defaults into a usable spec.
///
/// Called once per configuration change, never per frame. Durations are
/// floor-clamped and nonsensical radii are dropped.
pub fn resolve_motion(overrides: Option<&MotionOverride>, defaults: &MotionDefaults) -> MotionSpec {
    let mut spec = defaults.clone();
    if let Some(o) = overrides {
        if let Some(mode) = &o.mode {
            spec.mode = mode.clone();
        }
        if let Some(easing) = o.easing {
            spec.easing = easing;
        }
        if let Some(duration) = o.duration {
            spec.duration = duration;
        }
        if let Some(bounds) = o.bounds {
            spec.bounds = bounds;
        }
    }
    spec.duration = if spec.duration.is_finite() {
        spec.duration.max(MIN_SEGMENT_DURATION_SEC)
    } else {
        DEFAULT_SEGMENT_DURATION_SEC
    };
    if let MotionMode::Random { radius } = &mut spec.mode {
        *radius = radius.filter(|r| r.is_finite() && *r > 0.0);
    }
    spec
}

/// Runtime state of the motion track. Owned by the animator.
#[derive(Clone, Debug)]
pub(crate) struct MotionTrack {
    spec: MotionSpec,
    position: Vec2,
    start: Vec2,
    target: Vec2,
    progress: f32,
    path_index: usize,
}

impl MotionTrack {
    pub(crate) fn new<R: Rng>(spec: MotionSpec, base: Vec2, rng: &mut R) -> Self {
        let position = spec.bounds.clamp(base);
        let mut track = Self {
            spec,
            position,
            start: position,
            target: position,
            progress: 1.0,
            path_index: 0,
        };
        track.reseed(base, rng);
        track
    }

    pub(crate) fn spec(&self) -> &MotionSpec {
        &self.spec
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn target(&self) -> Vec2 {
        self.target
    }

    pub(crate) fn progress(&self) -> f32 {
        self.progress
    }

    pub(crate) fn path_index(&self) -> usize {
        self.path_index
    }

    /// Swap in a new spec and start a fresh segment from wherever the point is
    /// now, so the change never jumps visually (static mode excepted).
    pub(crate) fn reconfigure<R: Rng>(&mut self, spec: MotionSpec, base: Vec2, rng: &mut R) {
        self.spec = spec;
        self.reseed(base, rng);
    }

    fn is_holding(&self) -> bool {
        match &self.spec.mode {
            MotionMode::Static => true,
            MotionMode::Path(points) => points.is_empty(),
            MotionMode::Random { .. } => false,
        }
    }

    fn reseed<R: Rng>(&mut self, base: Vec2, rng: &mut R) {
        self.path_index = 0;
        if self.is_holding() {
            self.hold(base);
            return;
        }
        self.start = self.position;
        self.progress = 0.0;
        self.target = self.pick_target(base, rng);
    }

    fn hold(&mut self, base: Vec2) {
        self.position = self.spec.bounds.clamp(base);
        self.start = self.position;
        self.target = self.position;
        self.progress = 1.0;
    }

    fn pick_target<R: Rng>(&self, base: Vec2, rng: &mut R) -> Vec2 {
        let bounds = self.spec.bounds;
        match &self.spec.mode {
            MotionMode::Path(points) => match points.get(self.path_index) {
                Some(p) => bounds.clamp(*p),
                None => bounds.clamp(base),
            },
            MotionMode::Random { radius: Some(r) } => {
                let angle = rng.gen_range(0.0..TAU);
                let dist = r * rng.gen::<f32>().sqrt();
                bounds.clamp(base + Vec2::new(angle.cos(), angle.sin()) * dist)
            }
            MotionMode::Random { radius: None } => Vec2::new(
                rng.gen_range(bounds.min_x..=bounds.max_x),
                rng.gen_range(bounds.min_y..=bounds.max_y),
            ),
            MotionMode::Static => bounds.clamp(base),
        }
    }

    /// Advance by `dt` seconds and return the new position.
    ///
    /// At most one segment boundary is resolved per call: a step that
    /// overshoots lands on the current target and the following segment
    /// starts on the next call.
    pub(crate) fn step<R: Rng>(&mut self, dt: f32, base: Vec2, rng: &mut R) -> Vec2 {
        if self.is_holding() {
            self.hold(base);
            return self.position;
        }
        self.progress += dt / self.spec.duration.max(MIN_SEGMENT_DURATION_SEC);
        if self.progress >= 1.0 {
            self.position = self.target;
            self.start = self.target;
            self.progress = 0.0;
            if let MotionMode::Path(points) = &self.spec.mode {
                self.path_index = (self.path_index + 1) % points.len();
            }
            self.target = self.pick_target(base, rng);
        } else {
            let eased = self.spec.easing.apply(self.progress);
            self.position = self.start.lerp(self.target, eased);
        }
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn path(points: &[[f32; 2]]) -> MotionMode {
        MotionMode::Path(points.iter().map(|p| Vec2::from(*p)).collect())
    }

    #[test]
    fn bounds_normalize_swapped_edges() {
        let b = Bounds::new(0.5, -0.5, 1.0, -1.0);
        assert_eq!(b.min_x(), -0.5);
        assert_eq!(b.max_x(), 0.5);
        assert_eq!(b.min_y(), -1.0);
        assert_eq!(b.max_y(), 1.0);
        assert_eq!(Bounds::new(f32::NAN, 0.0, 0.0, 0.0), Bounds::default());
    }

    #[test]
    fn resolve_merges_and_floors_duration() {
        let defaults = MotionDefaults {
            duration: 3.0,
            easing: Easing::Smoothstep,
            ..Default::default()
        };
        let over = MotionOverride {
            mode: Some(MotionMode::Random { radius: Some(-2.0) }),
            duration: Some(0.0),
            ..Default::default()
        };
        let spec = resolve_motion(Some(&over), &defaults);
        assert_eq!(spec.mode, MotionMode::Random { radius: None });
        assert_eq!(spec.easing, Easing::Smoothstep);
        assert_eq!(spec.duration, MIN_SEGMENT_DURATION_SEC);
        assert_eq!(resolve_motion(None, &defaults), defaults);
    }

    #[test]
    fn static_snaps_to_clamped_base() {
        let mut rng = StdRng::seed_from_u64(1);
        let spec = MotionSpec {
            bounds: Bounds::new(-0.5, 0.5, -0.5, 0.5),
            ..Default::default()
        };
        let mut track = MotionTrack::new(spec, Vec2::new(2.0, -0.2), &mut rng);
        assert_eq!(track.position(), Vec2::new(0.5, -0.2));
        assert_eq!(track.progress(), 1.0);
        let p = track.step(100.0, Vec2::new(0.1, 0.1), &mut rng);
        assert_eq!(p, Vec2::new(0.1, 0.1));
    }

    #[test]
    fn empty_path_holds_position() {
        let mut rng = StdRng::seed_from_u64(1);
        let spec = MotionSpec {
            mode: path(&[]),
            ..Default::default()
        };
        let mut track = MotionTrack::new(spec, Vec2::new(0.3, 0.3), &mut rng);
        for _ in 0..10 {
            assert_eq!(track.step(0.5, Vec2::new(0.3, 0.3), &mut rng), Vec2::new(0.3, 0.3));
        }
    }

    #[test]
    fn segment_interpolates_with_easing() {
        let mut rng = StdRng::seed_from_u64(1);
        let spec = MotionSpec {
            mode: path(&[[1.0, 0.0]]),
            duration: 2.0,
            ..Default::default()
        };
        let mut track = MotionTrack::new(spec, Vec2::ZERO, &mut rng);
        let p = track.step(1.0, Vec2::ZERO, &mut rng);
        assert!((p.x - 0.5).abs() < 1e-6);
        let p = track.step(1.0, Vec2::ZERO, &mut rng);
        assert_eq!(p, Vec2::new(1.0, 0.0));
        assert_eq!(track.progress(), 0.0);
    }

    #[test]
    fn reconfigure_starts_from_current_position() {
        let mut rng = StdRng::seed_from_u64(9);
        let spec = MotionSpec {
            mode: path(&[[1.0, 0.0]]),
            duration: 1.0,
            ..Default::default()
        };
        let mut track = MotionTrack::new(spec.clone(), Vec2::ZERO, &mut rng);
        let here = track.step(0.25, Vec2::ZERO, &mut rng);
        let next = MotionSpec {
            mode: path(&[[0.0, 1.0]]),
            ..spec
        };
        track.reconfigure(next, Vec2::ZERO, &mut rng);
        assert_eq!(track.position(), here);
        assert_eq!(track.progress(), 0.0);
        assert_eq!(track.target(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn radius_targets_stay_near_base() {
        let mut rng = StdRng::seed_from_u64(3);
        let base = Vec2::new(0.2, -0.1);
        let spec = MotionSpec {
            mode: MotionMode::Random { radius: Some(0.25) },
            duration: 0.1,
            ..Default::default()
        };
        let mut track = MotionTrack::new(spec, base, &mut rng);
        for _ in 0..2000 {
            track.step(0.1, base, &mut rng);
            assert!(track.target().distance(base) <= 0.25 + 1e-5);
        }
    }
}
