use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn device_pixel_ratio() -> f32 {
    web::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0)
}

/// Layout (CSS pixel) size available to the canvas: its parent's box, since
/// the canvas' own CSS size is pinned by [`set_css_size`].
pub fn layout_size(canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = match canvas.parent_element() {
        Some(parent) => parent.get_bounding_client_rect(),
        None => canvas.get_bounding_client_rect(),
    };
    (rect.width() as f32, rect.height() as f32)
}

/// Pin the canvas' CSS size so a backing store of a different size is
/// stretched to it instead of changing the layout.
pub fn set_css_size(canvas: &web::HtmlCanvasElement, width: f32, height: f32) {
    let style = canvas.style();
    _ = style.set_property("width", &format!("{width}px"));
    _ = style.set_property("height", &format!("{height}px"));
}

/// A window event listener that is unregistered when dropped.
pub struct WindowListener {
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(window) = web::window() {
            _ = window.remove_event_listener_with_callback(
                self.event,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

pub fn on_window_resize(handler: impl FnMut() + 'static) -> Option<WindowListener> {
    let window = web::window()?;
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    window
        .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .ok()?;
    Some(WindowListener {
        event: "resize",
        closure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fire_resize() {
        let window = web::window().expect("window");
        let event = web::Event::new("resize").expect("event");
        window.dispatch_event(&event).expect("dispatch");
    }

    #[wasm_bindgen_test]
    fn dropped_resize_listener_is_unregistered_and_freed() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let listener =
            on_window_resize(move || counter.set(counter.get() + 1)).expect("listener");
        fire_resize();
        assert_eq!(hits.get(), 1);

        drop(listener);
        fire_resize();
        assert_eq!(hits.get(), 1);
        assert_eq!(Rc::strong_count(&hits), 1);
    }
}
