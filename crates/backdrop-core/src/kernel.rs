//! The contract every visual effect implements.

use crate::clock::FrameTime;
use crate::params::ParamMap;
use crate::surface::DisplaySize;

/// An interchangeable visual effect.
///
/// A kernel supplies a WGSL fragment body and the parameters it reads. The
/// renderer always adds `u_time` (seconds) and `u_resolution` (display size,
/// not buffer size) to the map, so aspect-correct math uses layout units.
///
/// Hooks run at most once per rendered frame, in display order; kernels must
/// not rely on any particular cadence beyond that.
pub trait VisualKernel {
    fn name(&self) -> &str;

    /// WGSL defining `fs_main(in: VsOut) -> @location(0) vec4<f32>`.
    fn shader_body(&self) -> &str;

    fn initial_params(&self) -> ParamMap;

    /// Called once after the program has been built.
    fn on_init(&mut self, _params: &mut ParamMap) {}

    /// Called every frame before the draw; may update `params` in place.
    fn on_render(&mut self, _frame: FrameTime, _params: &mut ParamMap) {}

    fn on_resize(&mut self, _display: DisplaySize, _params: &mut ParamMap) {}
}
