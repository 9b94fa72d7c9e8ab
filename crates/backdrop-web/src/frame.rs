use crate::dom;
use crate::render::GpuBackend;
use backdrop_core::{DisplaySize, Renderer};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub renderer: Renderer<GpuBackend>,
    pub canvas: web::HtmlCanvasElement,
}

impl FrameContext {
    pub fn frame(&mut self) {
        if let Err(e) = self.renderer.tick(Instant::now()) {
            log::error!("[frame] {e}");
        }
    }

    /// Re-measure the canvas container and forward DPR and layout changes.
    pub fn sync_size(&mut self) {
        let (width, height) = dom::layout_size(&self.canvas);
        if let Err(e) = self
            .renderer
            .set_device_pixel_ratio(dom::device_pixel_ratio())
        {
            log::error!("[resize] dpr: {e}");
        }
        if let Err(e) = self.renderer.resize(DisplaySize::new(width, height)) {
            log::error!("[resize] {e}");
        }
    }
}

type TickClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// requestAnimationFrame driver. Keeps rescheduling itself for as long as the
/// renderer reports it wants another frame.
pub struct FrameLoop {
    tick: TickClosure,
    request_id: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn new(ctx: Rc<RefCell<FrameContext>>) -> Self {
        let tick: TickClosure = Rc::new(RefCell::new(None));
        let request_id = Rc::new(Cell::new(None));

        let tick_clone = tick.clone();
        let id_clone = request_id.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            id_clone.set(None);
            let again = match ctx.try_borrow_mut() {
                Ok(mut ctx) => {
                    ctx.frame();
                    ctx.renderer.wants_next_frame()
                }
                // Re-entered from a host call; try again next frame.
                Err(_) => true,
            };
            if again {
                id_clone.set(request(&tick_clone));
            }
        }) as Box<dyn FnMut()>));

        Self { tick, request_id }
    }

    /// Request the next frame unless one is already pending.
    pub fn schedule(&self) {
        if self.request_id.get().is_none() {
            self.request_id.set(request(&self.tick));
        }
    }

    pub fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.request_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        // Break the closure's self-reference.
        self.tick.borrow_mut().take();
    }
}

fn request(tick: &TickClosure) -> Option<i32> {
    let window = web::window()?;
    let tick = tick.borrow();
    let closure = tick.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}
