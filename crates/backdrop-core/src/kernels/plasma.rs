use crate::kernel::VisualKernel;
use crate::params::{ParamMap, ParamValue};

/// Shader-only kernel: classic sine plasma driven by `u_time`.
#[derive(Clone, Debug)]
pub struct PlasmaKernel {
    pub speed: f32,
    pub scale: f32,
}

impl Default for PlasmaKernel {
    fn default() -> Self {
        Self {
            speed: 0.6,
            scale: 3.0,
        }
    }
}

impl PlasmaKernel {
    pub const NAME: &'static str = "plasma";
}

impl VisualKernel for PlasmaKernel {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn shader_body(&self) -> &str {
        super::PLASMA_WGSL
    }

    fn initial_params(&self) -> ParamMap {
        ParamMap::new()
            .with("u_speed", ParamValue::Float(self.speed))
            .with("u_scale", ParamValue::Float(self.scale))
    }
}
