#![cfg(target_arch = "wasm32")]
use backdrop_core::{kernels, DisplaySize, Renderer, RendererOptions};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod dom;
mod frame;
mod render;

use frame::{FrameContext, FrameLoop};
use render::GpuBackend;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web loaded");
    Ok(())
}

/// A running backdrop bound to one canvas.
#[wasm_bindgen]
pub struct Backdrop {
    ctx: Rc<RefCell<FrameContext>>,
    frame_loop: FrameLoop,
    // dropped with the handle, which unregisters it
    _resize_listener: Option<dom::WindowListener>,
}

#[wasm_bindgen]
impl Backdrop {
    /// Bind `kernel` to the canvas with id `canvas_id`. Rendering starts on
    /// [`start`](Self::start).
    pub async fn create(
        canvas_id: String,
        kernel: String,
        single_shot: bool,
    ) -> Result<Backdrop, JsValue> {
        init(&canvas_id, &kernel, single_shot).await.map_err(to_js)
    }

    pub fn start(&self) -> Result<(), JsValue> {
        let wants_frame = {
            let mut ctx = self.ctx.borrow_mut();
            ctx.renderer
                .start(Instant::now())
                .map_err(|e| to_js(e.into()))?;
            ctx.renderer.wants_next_frame()
        };
        if wants_frame {
            self.frame_loop.schedule();
        }
        Ok(())
    }

    pub fn stop(&self) {
        self.ctx.borrow_mut().renderer.stop();
        self.frame_loop.cancel();
    }

    /// Draw one frame now, applying any deferred resize first.
    pub fn render(&self) -> Result<(), JsValue> {
        self.ctx
            .borrow_mut()
            .renderer
            .render(Instant::now())
            .map_err(|e| to_js(e.into()))
    }

    /// Re-measure the canvas container.
    pub fn resize(&self) {
        self.ctx.borrow_mut().sync_size();
    }

    pub fn set_render_scale(&self, scale: f32) -> Result<(), JsValue> {
        self.ctx
            .borrow_mut()
            .renderer
            .set_render_scale(scale)
            .map_err(|e| to_js(e.into()))
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.ctx.borrow().renderer.elapsed_seconds()
    }
}

async fn init(canvas_id: &str, kernel_name: &str, single_shot: bool) -> anyhow::Result<Backdrop> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{canvas_id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let kernel = kernels::by_name(kernel_name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown kernel {kernel_name:?}, expected one of {:?}",
            kernels::BUILTIN_NAMES
        )
    })?;

    let (width, height) = dom::layout_size(&canvas);
    let backend = GpuBackend::new(canvas.clone()).await?;
    let options = RendererOptions::default()
        .device_pixel_ratio(dom::device_pixel_ratio())
        .single_shot(single_shot);
    let mut renderer = Renderer::new(
        backend,
        options,
        DisplaySize::new(width, height),
        Instant::now(),
    )?;
    renderer.attach_kernel(kernel)?;
    log::info!(
        "[init] kernel {kernel_name} on #{canvas_id} ({width}x{height}, single_shot={single_shot})"
    );

    let ctx = Rc::new(RefCell::new(FrameContext { renderer, canvas }));
    let weak = Rc::downgrade(&ctx);
    let resize_listener = dom::on_window_resize(move || {
        let Some(ctx) = weak.upgrade() else {
            return;
        };
        if let Ok(mut ctx) = ctx.try_borrow_mut() {
            ctx.sync_size();
        }
    });
    if resize_listener.is_none() {
        log::warn!("[init] could not listen for window resizes");
    }
    let frame_loop = FrameLoop::new(ctx.clone());
    Ok(Backdrop {
        ctx,
        frame_loop,
        _resize_listener: resize_listener,
    })
}

fn to_js(e: anyhow::Error) -> JsValue {
    js_sys::Error::new(&format!("{e:#}")).into()
}
