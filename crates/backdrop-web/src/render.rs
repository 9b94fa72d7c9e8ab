use backdrop_core::{BackendError, BufferSize, DisplaySize, GraphicsBackend, UniformLayout};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

use crate::dom;

mod helpers;

/// Program-dependent GPU objects, rebuilt whenever a kernel is attached.
struct KernelProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniform_size: usize,
}

/// WebGPU implementation of [`GraphicsBackend`] over an HTML canvas.
pub struct GpuBackend {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    program: Option<KernelProgram>,
    // validation error of the last build, filled in once the error scope resolves
    program_error: Rc<RefCell<Option<String>>>,
    clear_color: wgpu::Color,
}

impl GpuBackend {
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        device.on_uncaptured_error(Box::new(|e| {
            log::error!("[gpu] uncaptured error: {e}");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface ready {width}x{height} {format:?}");

        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            program: None,
            program_error: Rc::new(RefCell::new(None)),
            clear_color: wgpu::Color::BLACK,
        })
    }
}

impl GraphicsBackend for GpuBackend {
    fn build_program(&mut self, source: &str, layout: &UniformLayout) -> Result<(), BackendError> {
        self.program_error.borrow_mut().take();
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("kernel_shader"),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        let bgl = helpers::create_uniform_bind_group_layout(&self.device);
        let pl = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("kernel_pl"),
                bind_group_layouts: &[&bgl],
                push_constant_ranges: &[],
            });
        let pipeline = helpers::make_fullscreen_pipeline(&self.device, &pl, &shader, self.config.format);
        let scope = self.device.pop_error_scope();
        let slot = self.program_error.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(e) = scope.await {
                log::error!("[gpu] kernel program rejected: {e}");
                *slot.borrow_mut() = Some(e.to_string());
            }
        });
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("kernel_uniforms"),
            size: layout.size() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kernel_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        self.program = Some(KernelProgram {
            pipeline,
            uniform_buffer,
            bind_group,
            uniform_size: layout.size(),
        });
        Ok(())
    }

    fn resize_buffer(&mut self, size: BufferSize) -> Result<(), BackendError> {
        let max = self.device.limits().max_texture_dimension_2d;
        let width = size.width.clamp(1, max);
        let height = size.height.clamp(1, max);
        // Setting the backing size clears the canvas.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        Ok(())
    }

    fn set_display_size(&mut self, display: DisplaySize) {
        dom::set_css_size(&self.canvas, display.width, display.height);
    }

    fn draw(&mut self, uniforms: &[u8]) -> Result<(), BackendError> {
        if let Some(msg) = self.program_error.borrow().clone() {
            return Err(BackendError::Program(msg));
        }
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| BackendError::Program("no program built".into()))?;
        if uniforms.len() != program.uniform_size {
            return Err(BackendError::Layout(format!(
                "expected {} bytes, got {}",
                program.uniform_size,
                uniforms.len()
            )));
        }
        self.queue.write_buffer(&program.uniform_buffer, 0, uniforms);

        let frame = self
            .surface
            .get_current_texture()
            .map_err(|e| BackendError::Surface(format!("{e:?}")))?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("kernel_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&program.pipeline);
            rpass.set_bind_group(0, &program.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
