//! Platform-independent core of the backdrop renderer.
//!
//! A [`Renderer`] owns the frame clock, the display/buffer sizing contract and
//! the active [`VisualKernel`], and drives any [`GraphicsBackend`]. The
//! [`animation`] module holds the reusable point animation engine used by the
//! `points` kernel.

pub mod animation;
pub mod clock;
pub mod color;
pub mod constants;
pub mod error;
pub mod kernel;
pub mod kernels;
pub mod params;
pub mod renderer;
pub mod shader;
pub mod surface;

pub use animation::{
    Bounds, Easing, MotionDefaults, MotionMode, MotionOverride, MotionSpec, PointAnimator,
    PointSnapshot, PointSpec,
};
pub use clock::{Clock, FrameTime, LoopDriver, StartAction};
pub use error::{BackendError, RenderError};
pub use kernel::VisualKernel;
pub use params::{ParamMap, ParamValue, UniformLayout};
pub use renderer::{GraphicsBackend, Renderer, RendererOptions};
pub use surface::{BufferSize, DisplaySize, ResizeOutcome, SurfaceManager};
