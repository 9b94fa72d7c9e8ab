//! Point animation engine.
//!
//! Drives a bounded, ordered collection of points. Each point carries two
//! independent tracks: motion (static, waypoint path or random targets) and a
//! color cycle. Callers describe points declaratively; the engine owns all
//! runtime state and writes per-frame results into fixed output slots.

mod color_cycle;
pub mod easing;
pub mod motion;

pub use easing::Easing;
pub use motion::{
    resolve_motion, Bounds, MotionDefaults, MotionMode, MotionOverride, MotionSpec, Waypoints,
};

use crate::color::parse_css_color;
use crate::constants::{DEFAULT_COLOR_SPEED, MAX_POINTS};
use color_cycle::ColorTrack;
use glam::{Vec2, Vec3};
use motion::MotionTrack;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

/// Declarative description of one point.
#[derive(Clone, Debug)]
pub struct PointSpec {
    pub x: f32,
    pub y: f32,
    pub colors: Vec<String>,
    pub speed: f32,
    pub motion: Option<MotionOverride>,
}

impl Default for PointSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            colors: Vec::new(),
            speed: DEFAULT_COLOR_SPEED,
            motion: None,
        }
    }
}

impl PointSpec {
    pub fn new(x: f32, y: f32, colors: &[&str]) -> Self {
        Self {
            x,
            y,
            colors: colors.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_motion(mut self, motion: MotionOverride) -> Self {
        self.motion = Some(motion);
        self
    }
}

/// Read-only view of a point's runtime state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSnapshot {
    pub position: Vec2,
    pub target: Vec2,
    pub motion_progress: f32,
    pub path_index: usize,
    pub color: Vec3,
    pub color_index: usize,
    pub color_progress: f32,
}

type ColorSequence = SmallVec<[Vec3; 4]>;

struct AnimatedPoint {
    base: Vec2,
    colors: ColorSequence,
    speed: f32,
    motion_override: Option<MotionOverride>,
    motion: MotionTrack,
    color: ColorTrack,
}

pub struct PointAnimator {
    points: Vec<AnimatedPoint>,
    defaults: MotionDefaults,
    rng: StdRng,
    positions: [[f32; 2]; MAX_POINTS],
    colors: [[f32; 3]; MAX_POINTS],
}

fn parse_colors(colors: &[String]) -> ColorSequence {
    let parsed: ColorSequence = colors.iter().filter_map(|c| parse_css_color(c)).collect();
    if parsed.len() != colors.len() {
        log::warn!(
            "[points] {} of {} colors could not be parsed and were skipped",
            colors.len() - parsed.len(),
            colors.len()
        );
    }
    parsed
}

fn sanitize_base(x: f32, y: f32, fallback: Vec2) -> Vec2 {
    Vec2::new(
        if x.is_finite() { x } else { fallback.x },
        if y.is_finite() { y } else { fallback.y },
    )
}

fn sanitize_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        DEFAULT_COLOR_SPEED
    }
}

impl PointAnimator {
    /// Register `specs` in order. Anything past [`MAX_POINTS`] is dropped.
    pub fn new(specs: Vec<PointSpec>, defaults: MotionDefaults, seed: u64) -> Self {
        if specs.len() > MAX_POINTS {
            log::warn!(
                "[points] {} points configured, keeping the first {}",
                specs.len(),
                MAX_POINTS
            );
        }
        let mut animator = Self {
            points: Vec::with_capacity(MAX_POINTS),
            defaults,
            rng: StdRng::seed_from_u64(seed),
            positions: [[0.0; 2]; MAX_POINTS],
            colors: [[0.0; 3]; MAX_POINTS],
        };
        for spec in specs.into_iter().take(MAX_POINTS) {
            animator.push_point(spec);
        }
        animator
    }

    /// Declared number of live points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn defaults(&self) -> &MotionDefaults {
        &self.defaults
    }

    /// Append a point. Returns `false` (and ignores it) when at capacity.
    pub fn push_point(&mut self, spec: PointSpec) -> bool {
        if self.points.len() >= MAX_POINTS {
            log::warn!("[points] cap of {} reached, point ignored", MAX_POINTS);
            return false;
        }
        let base = sanitize_base(spec.x, spec.y, Vec2::ZERO);
        let resolved = resolve_motion(spec.motion.as_ref(), &self.defaults);
        let motion = MotionTrack::new(resolved, base, &mut self.rng);
        let i = self.points.len();
        self.positions[i] = motion.position().to_array();
        let colors = parse_colors(&spec.colors);
        self.colors[i] = colors.first().copied().unwrap_or(Vec3::ZERO).to_array();
        self.points.push(AnimatedPoint {
            base,
            colors,
            speed: sanitize_speed(spec.speed),
            motion_override: spec.motion,
            motion,
            color: ColorTrack::default(),
        });
        true
    }

    /// Remove a point; later points shift down one slot.
    pub fn remove_point(&mut self, index: usize) -> bool {
        if index >= self.points.len() {
            return false;
        }
        self.points.remove(index);
        let len = self.points.len();
        self.positions.copy_within(index + 1..=len, index);
        self.colors.copy_within(index + 1..=len, index);
        true
    }

    pub fn set_base_position(&mut self, index: usize, x: f32, y: f32) {
        if let Some(p) = self.points.get_mut(index) {
            p.base = sanitize_base(x, y, p.base);
        }
    }

    pub fn set_colors(&mut self, index: usize, colors: &[String]) {
        if let Some(p) = self.points.get_mut(index) {
            p.colors = parse_colors(colors);
        }
    }

    pub fn set_speed(&mut self, index: usize, speed: f32) {
        if let Some(p) = self.points.get_mut(index) {
            p.speed = sanitize_speed(speed);
        }
    }

    /// Replace a point's motion overrides. The point is re-seeded only when
    /// the resolved spec actually differs.
    pub fn set_motion(&mut self, index: usize, motion: Option<MotionOverride>) {
        let Some(p) = self.points.get_mut(index) else {
            return;
        };
        p.motion_override = motion;
        let resolved = resolve_motion(p.motion_override.as_ref(), &self.defaults);
        if &resolved != p.motion.spec() {
            p.motion.reconfigure(resolved, p.base, &mut self.rng);
        }
    }

    /// Replace the kernel-wide defaults and re-seed every point whose
    /// resolved spec changed as a result.
    pub fn set_defaults(&mut self, defaults: MotionDefaults) {
        self.defaults = defaults;
        for p in &mut self.points {
            let resolved = resolve_motion(p.motion_override.as_ref(), &self.defaults);
            if &resolved != p.motion.spec() {
                p.motion.reconfigure(resolved, p.base, &mut self.rng);
            }
        }
    }

    /// Advance every live point by `dt` seconds and refresh the output slots.
    ///
    /// Negative or non-finite steps are treated as zero. A step longer than a
    /// whole segment resolves a single segment boundary per call.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        for (i, p) in self.points.iter_mut().enumerate() {
            let pos = p.motion.step(dt, p.base, &mut self.rng);
            let color = p.color.step(dt, p.speed, &p.colors);
            self.positions[i] = pos.to_array();
            self.colors[i] = color.to_array();
        }
    }

    /// Current positions, one per live point.
    pub fn positions(&self) -> &[[f32; 2]] {
        &self.positions[..self.points.len()]
    }

    /// Current colors (linear RGB), one per live point.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors[..self.points.len()]
    }

    pub fn snapshot(&self, index: usize) -> Option<PointSnapshot> {
        let p = self.points.get(index)?;
        Some(PointSnapshot {
            position: p.motion.position(),
            target: p.motion.target(),
            motion_progress: p.motion.progress(),
            path_index: p.motion.path_index(),
            color: Vec3::from(self.colors[index]),
            color_index: p.color.current_index(),
            color_progress: p.color.progress(),
        })
    }

    pub fn motion_spec(&self, index: usize) -> Option<&MotionSpec> {
        self.points.get(index).map(|p| p.motion.spec())
    }
}
