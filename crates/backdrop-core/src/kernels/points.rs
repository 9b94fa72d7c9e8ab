use crate::animation::{MotionDefaults, MotionMode, PointAnimator, PointSpec};
use crate::clock::FrameTime;
use crate::constants::MAX_POINTS;
use crate::kernel::VisualKernel;
use crate::params::{ParamMap, ParamValue};

const P_COUNT: &str = "u_point_count";
const P_POSITIONS: &str = "u_positions";
const P_COLORS: &str = "u_colors";
const P_SOFTNESS: &str = "u_softness";

/// Mesh-gradient kernel whose control points are animated by a
/// [`PointAnimator`].
pub struct PointsKernel {
    animator: PointAnimator,
    softness: f32,
}

impl Default for PointsKernel {
    /// Four drifting corner points with a warm/cool palette.
    fn default() -> Self {
        let defaults = MotionDefaults {
            mode: MotionMode::Random { radius: Some(0.6) },
            ..Default::default()
        };
        let specs = vec![
            PointSpec::new(-0.6, 0.6, &["#ff5f6d", "#ffc371"]),
            PointSpec::new(0.6, 0.6, &["#2193b0", "#6dd5ed"]).with_speed(0.07),
            PointSpec::new(-0.6, -0.6, &["#8e2de2", "#4a00e0"]).with_speed(0.05),
            PointSpec::new(0.6, -0.6, &["#11998e", "#38ef7d"]).with_speed(0.12),
        ];
        Self::new(specs, defaults, 42)
    }
}

impl PointsKernel {
    pub const NAME: &'static str = "points";

    pub fn new(specs: Vec<PointSpec>, defaults: MotionDefaults, seed: u64) -> Self {
        Self {
            animator: PointAnimator::new(specs, defaults, seed),
            softness: 1.5,
        }
    }

    pub fn with_softness(mut self, softness: f32) -> Self {
        self.softness = softness;
        self
    }

    pub fn animator(&self) -> &PointAnimator {
        &self.animator
    }

    /// Between-frame access for changing point configuration.
    pub fn animator_mut(&mut self) -> &mut PointAnimator {
        &mut self.animator
    }

    fn publish(&self, params: &mut ParamMap) {
        params.set_int(P_COUNT, self.animator.len() as i32);
        params.write_vec2_array(P_POSITIONS, self.animator.positions());
        params.write_vec3_array(P_COLORS, self.animator.colors());
    }
}

impl VisualKernel for PointsKernel {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn shader_body(&self) -> &str {
        super::POINTS_WGSL
    }

    fn initial_params(&self) -> ParamMap {
        ParamMap::new()
            .with(P_COUNT, ParamValue::Int(0))
            .with(P_POSITIONS, ParamValue::Vec2Array(vec![[0.0; 2]; MAX_POINTS]))
            .with(P_COLORS, ParamValue::Vec3Array(vec![[0.0; 3]; MAX_POINTS]))
            .with(P_SOFTNESS, ParamValue::Float(self.softness))
    }

    fn on_init(&mut self, params: &mut ParamMap) {
        self.publish(params);
    }

    fn on_render(&mut self, frame: FrameTime, params: &mut ParamMap) {
        self.animator.tick(frame.dt_seconds());
        self.publish(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_publishes_animator_output() {
        let mut kernel = PointsKernel::new(
            vec![PointSpec::new(0.25, -0.5, &["#ff0000", "#0000ff"]).with_speed(1.0)],
            MotionDefaults::default(),
            1,
        );
        let mut params = kernel.initial_params();
        kernel.on_init(&mut params);
        kernel.on_render(
            FrameTime {
                dt_ms: 500.0,
                elapsed_seconds: 0.5,
            },
            &mut params,
        );
        assert_eq!(params.get(P_COUNT), Some(&ParamValue::Int(1)));
        match params.get(P_POSITIONS) {
            Some(ParamValue::Vec2Array(v)) => {
                assert_eq!(v.len(), MAX_POINTS);
                assert_eq!(v[0], [0.25, -0.5]);
            }
            other => panic!("unexpected {other:?}"),
        }
        match params.get(P_COLORS) {
            Some(ParamValue::Vec3Array(v)) => assert_eq!(v[0], [0.5, 0.0, 0.5]),
            other => panic!("unexpected {other:?}"),
        }
    }
}
