//! Frame lifecycle: surface sizing, clock, kernel hooks and the draw call.

use crate::clock::{LoopDriver, StartAction};
use crate::constants::{PARAM_RESOLUTION, PARAM_TIME};
use crate::error::{BackendError, RenderError};
use crate::kernel::VisualKernel;
use crate::params::{ParamMap, UniformLayout};
use crate::shader::compose_shader;
use crate::surface::{BufferSize, DisplaySize, ResizeOutcome, SurfaceManager};
use instant::Instant;

/// The graphics runtime the renderer drives.
pub trait GraphicsBackend {
    /// Compile a complete WGSL module whose uniform block follows `layout`.
    ///
    /// Backends that validate asynchronously may accept the source here and
    /// report [`BackendError::Program`] from a later [`draw`](Self::draw).
    fn build_program(&mut self, source: &str, layout: &UniformLayout) -> Result<(), BackendError>;

    /// Reallocate the drawing buffer. Its previous contents are lost.
    fn resize_buffer(&mut self, size: BufferSize) -> Result<(), BackendError>;

    /// Set the logical (layout) size the buffer is stretched to.
    fn set_display_size(&mut self, display: DisplaySize);

    /// Upload `uniforms` and issue one full-screen draw.
    fn draw(&mut self, uniforms: &[u8]) -> Result<(), BackendError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererOptions {
    pub render_scale: f32,
    pub device_pixel_ratio: f32,
    pub single_shot: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            render_scale: 1.0,
            device_pixel_ratio: 1.0,
            single_shot: false,
        }
    }
}

impl RendererOptions {
    pub fn render_scale(mut self, scale: f32) -> Self {
        self.render_scale = scale;
        self
    }

    pub fn device_pixel_ratio(mut self, dpr: f32) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }

    pub fn single_shot(mut self, single_shot: bool) -> Self {
        self.single_shot = single_shot;
        self
    }
}

pub struct Renderer<B: GraphicsBackend> {
    backend: B,
    surface: SurfaceManager,
    driver: LoopDriver,
    kernel: Option<Box<dyn VisualKernel>>,
    params: ParamMap,
    layout: UniformLayout,
    uniform_bytes: Vec<u8>,
}

impl<B: GraphicsBackend> Renderer<B> {
    pub fn new(
        mut backend: B,
        options: RendererOptions,
        display: DisplaySize,
        now: Instant,
    ) -> Result<Self, RenderError> {
        let mut surface = SurfaceManager::new();
        let outcome = surface.configure(
            display,
            options.render_scale,
            options.device_pixel_ratio,
            options.single_shot,
        );
        backend.set_display_size(surface.display_size());
        if let ResizeOutcome::Applied(size) = outcome {
            backend.resize_buffer(size)?;
            surface.mark_applied(size);
        }
        Ok(Self {
            backend,
            surface,
            driver: LoopDriver::new(now, options.single_shot),
            kernel: None,
            params: ParamMap::with_builtins(),
            layout: UniformLayout::default(),
            uniform_bytes: Vec::new(),
        })
    }

    /// Build the kernel's program and make it the active kernel, replacing any
    /// previous one.
    pub fn attach_kernel(&mut self, mut kernel: Box<dyn VisualKernel>) -> Result<(), RenderError> {
        let declared = kernel.initial_params();
        let mut params = ParamMap::with_builtins();
        for (name, value) in declared.iter() {
            if name == PARAM_TIME || name == PARAM_RESOLUTION {
                log::warn!("[renderer] kernel '{}' redeclares built-in {name}", kernel.name());
                continue;
            }
            params.insert(name, value.clone());
        }
        let layout = UniformLayout::from_params(&params);
        let source = compose_shader(&layout, kernel.shader_body());
        self.backend.build_program(&source, &layout)?;
        log::debug!(
            "[renderer] kernel '{}' built ({} params, {} uniform bytes)",
            kernel.name(),
            params.len(),
            layout.size()
        );

        self.uniform_bytes = vec![0; layout.size()];
        self.layout = layout;
        self.params = params;
        self.write_builtins();
        kernel.on_init(&mut self.params);
        kernel.on_resize(self.surface.display_size(), &mut self.params);
        self.kernel = Some(kernel);
        Ok(())
    }

    pub fn kernel_name(&self) -> Option<&str> {
        self.kernel.as_ref().map(|k| k.name())
    }

    /// Begin rendering. In single-shot mode this renders exactly one frame and
    /// schedules nothing; otherwise the host should start calling
    /// [`tick`](Self::tick) once per frame while
    /// [`wants_next_frame`](Self::wants_next_frame) holds.
    pub fn start(&mut self, now: Instant) -> Result<(), RenderError> {
        match self.driver.start() {
            StartAction::RenderOnce => self.render(now),
            StartAction::Schedule => Ok(()),
        }
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn wants_next_frame(&self) -> bool {
        self.driver.is_running()
    }

    /// Scheduled frame. Does nothing once stopped, or while no kernel is
    /// attached.
    pub fn tick(&mut self, now: Instant) -> Result<(), RenderError> {
        if !self.driver.is_running() || self.kernel.is_none() {
            return Ok(());
        }
        self.frame(now)
    }

    /// Explicit frame, regardless of scheduling mode.
    pub fn render(&mut self, now: Instant) -> Result<(), RenderError> {
        if self.kernel.is_none() {
            return Err(RenderError::NoKernel);
        }
        self.frame(now)
    }

    fn frame(&mut self, now: Instant) -> Result<(), RenderError> {
        // A size that failed to apply stays pending and is retried next frame.
        if let Some(size) = self.surface.pending_resize() {
            log::debug!("[renderer] applying pending resize {}x{}", size.width, size.height);
            self.backend.resize_buffer(size)?;
            self.surface.mark_applied(size);
        }
        let time = self.driver.tick(now);
        self.write_builtins();
        if let Some(kernel) = self.kernel.as_mut() {
            kernel.on_render(time, &mut self.params);
        }
        self.layout.pack_into(&self.params, &mut self.uniform_bytes);
        self.backend.draw(&self.uniform_bytes)?;
        Ok(())
    }

    fn write_builtins(&mut self) {
        let elapsed = self.driver.clock().elapsed_seconds() as f32;
        self.params.set_float(PARAM_TIME, elapsed);
        self.params
            .set_vec2(PARAM_RESOLUTION, self.surface.display_size().to_array());
    }

    /// New layout size. In single-shot mode the buffer is left alone until the
    /// next [`render`](Self::render).
    pub fn resize(&mut self, display: DisplaySize) -> Result<(), RenderError> {
        let previous = self.surface.display_size();
        let outcome = self.surface.resize(display);
        let applied = self.apply_outcome(outcome);
        if previous != self.surface.display_size() {
            if let Some(kernel) = self.kernel.as_mut() {
                kernel.on_resize(self.surface.display_size(), &mut self.params);
            }
        }
        applied
    }

    pub fn set_render_scale(&mut self, render_scale: f32) -> Result<(), RenderError> {
        let outcome = self.surface.set_render_scale(render_scale);
        self.apply_outcome(outcome)
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f32) -> Result<(), RenderError> {
        let outcome = self.surface.set_device_pixel_ratio(dpr);
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: ResizeOutcome) -> Result<(), RenderError> {
        self.backend.set_display_size(self.surface.display_size());
        match outcome {
            ResizeOutcome::Applied(size) => {
                log::debug!("[renderer] buffer resized to {}x{}", size.width, size.height);
                self.backend.resize_buffer(size)?;
                self.surface.mark_applied(size);
            }
            ResizeOutcome::Deferred(size) => {
                log::debug!("[renderer] resize to {}x{} deferred", size.width, size.height);
            }
            ResizeOutcome::Unchanged => {}
        }
        Ok(())
    }

    /// Stop the loop and drop the kernel. Later explicit renders fail with
    /// [`RenderError::NoKernel`].
    pub fn destroy(&mut self) {
        self.driver.stop();
        if let Some(kernel) = self.kernel.take() {
            log::debug!("[renderer] kernel '{}' released", kernel.name());
        }
    }

    pub fn display_size(&self) -> DisplaySize {
        self.surface.display_size()
    }

    pub fn buffer_size(&self) -> BufferSize {
        self.surface.buffer_size()
    }

    pub fn pending_resize(&self) -> Option<BufferSize> {
        self.surface.pending_resize()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.driver.clock().elapsed_seconds()
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
