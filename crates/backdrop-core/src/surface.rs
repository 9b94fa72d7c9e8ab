//! Display size vs drawing-buffer size.
//!
//! The display size is what layout reports; the buffer size is what actually
//! gets rendered (`floor(display * scale)`, at least one pixel per axis). In
//! single-shot mode a resize is only recorded and gets applied at the start of
//! the next explicit render, so the last frame stays on screen untouched.

use crate::constants::{MAX_RESOLUTION_SCALE, MIN_BUFFER_PX, MIN_RESOLUTION_SCALE};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: clean(width),
            height: clean(height),
        }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.width, self.height]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferSize {
    pub width: u32,
    pub height: u32,
}

/// Result of a sizing request, telling the caller whether the device buffer
/// has to be reallocated now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    Applied(BufferSize),
    Deferred(BufferSize),
    Unchanged,
}

/// Product of render scale and device pixel ratio, clamped to a sane range.
pub fn effective_scale(render_scale: f32, device_pixel_ratio: f32) -> f32 {
    let s = render_scale * device_pixel_ratio;
    if !s.is_finite() {
        log::warn!("[surface] non-finite resolution scale, using 1.0");
        return 1.0;
    }
    let clamped = s.clamp(MIN_RESOLUTION_SCALE, MAX_RESOLUTION_SCALE);
    if clamped != s {
        log::warn!("[surface] resolution scale {s} clamped to {clamped}");
    }
    clamped
}

pub fn buffer_size_for(display: DisplaySize, scale: f32) -> BufferSize {
    let px = |v: f32| ((v * scale).floor() as u32).max(MIN_BUFFER_PX);
    BufferSize {
        width: px(display.width),
        height: px(display.height),
    }
}

#[derive(Clone, Debug)]
pub struct SurfaceManager {
    display: DisplaySize,
    render_scale: f32,
    device_pixel_ratio: f32,
    scale: f32,
    single_shot: bool,
    target: BufferSize,
    applied: Option<BufferSize>,
    pending: Option<BufferSize>,
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self {
            display: DisplaySize::default(),
            render_scale: 1.0,
            device_pixel_ratio: 1.0,
            scale: 1.0,
            single_shot: false,
            target: BufferSize {
                width: MIN_BUFFER_PX,
                height: MIN_BUFFER_PX,
            },
            applied: None,
            pending: None,
        }
    }
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(
        &mut self,
        display: DisplaySize,
        render_scale: f32,
        device_pixel_ratio: f32,
        single_shot: bool,
    ) -> ResizeOutcome {
        self.display = display;
        self.render_scale = render_scale;
        self.device_pixel_ratio = device_pixel_ratio;
        self.scale = effective_scale(render_scale, device_pixel_ratio);
        self.single_shot = single_shot;
        self.request()
    }

    pub fn resize(&mut self, display: DisplaySize) -> ResizeOutcome {
        self.display = display;
        self.request()
    }

    pub fn set_render_scale(&mut self, render_scale: f32) -> ResizeOutcome {
        self.render_scale = render_scale;
        self.scale = effective_scale(render_scale, self.device_pixel_ratio);
        self.request()
    }

    pub fn set_device_pixel_ratio(&mut self, device_pixel_ratio: f32) -> ResizeOutcome {
        self.device_pixel_ratio = device_pixel_ratio;
        self.scale = effective_scale(self.render_scale, device_pixel_ratio);
        self.request()
    }

    // A requested size stays pending until the backend confirms it through
    // `mark_applied`, in both modes.
    fn request(&mut self) -> ResizeOutcome {
        let target = buffer_size_for(self.display, self.scale);
        self.target = target;
        if self.applied == Some(target) {
            self.pending = None;
            return ResizeOutcome::Unchanged;
        }
        self.pending = Some(target);
        if self.single_shot {
            ResizeOutcome::Deferred(target)
        } else {
            ResizeOutcome::Applied(target)
        }
    }

    /// Record that the backend now holds a buffer of `size`. Clears the
    /// pending request if it was for the same size.
    pub fn mark_applied(&mut self, size: BufferSize) {
        self.applied = Some(size);
        if self.pending == Some(size) {
            self.pending = None;
        }
    }

    pub fn pending_resize(&self) -> Option<BufferSize> {
        self.pending
    }

    pub fn display_size(&self) -> DisplaySize {
        self.display
    }

    /// Buffer size implied by the current display size and scale.
    pub fn buffer_size(&self) -> BufferSize {
        self.target
    }

    /// Buffer size the device currently has, if any was applied yet.
    pub fn applied_buffer_size(&self) -> Option<BufferSize> {
        self.applied
    }

    pub fn resolution_scale(&self) -> f32 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> BufferSize {
        BufferSize {
            width: w,
            height: h,
        }
    }

    #[test]
    fn buffer_is_floor_of_display_times_scale() {
        let mut s = SurfaceManager::new();
        let out = s.configure(DisplaySize::new(300.5, 200.0), 0.5, 2.0, false);
        assert_eq!(out, ResizeOutcome::Applied(size(300, 200)));
        assert_eq!(s.display_size(), DisplaySize::new(300.5, 200.0));
    }

    #[test]
    fn degenerate_sizes_clamp_to_one_pixel() {
        let mut s = SurfaceManager::new();
        s.configure(DisplaySize::new(-50.0, f32::NAN), 1.0, 1.0, false);
        assert_eq!(s.buffer_size(), size(1, 1));
        s.configure(DisplaySize::new(100.0, 100.0), 0.0, 1.0, false);
        assert_eq!(s.resolution_scale(), MIN_RESOLUTION_SCALE);
        assert_eq!(s.buffer_size(), size(1, 1));
    }

    #[test]
    fn scale_is_clamped_high() {
        let mut s = SurfaceManager::new();
        s.configure(DisplaySize::new(10.0, 10.0), 4.0, 4.0, false);
        assert_eq!(s.resolution_scale(), MAX_RESOLUTION_SCALE);
        assert_eq!(s.buffer_size(), size(80, 80));
    }

    #[test]
    fn single_shot_defers_until_marked() {
        let mut s = SurfaceManager::new();
        assert!(matches!(
            s.configure(DisplaySize::new(100.0, 50.0), 1.0, 1.0, true),
            ResizeOutcome::Deferred(_)
        ));
        assert_eq!(s.pending_resize(), Some(size(100, 50)));
        s.mark_applied(size(100, 50));
        assert_eq!(s.pending_resize(), None);

        assert_eq!(
            s.resize(DisplaySize::new(200.0, 50.0)),
            ResizeOutcome::Deferred(size(200, 50))
        );
        assert_eq!(s.applied_buffer_size(), Some(size(100, 50)));
        assert_eq!(
            s.resize(DisplaySize::new(300.0, 60.0)),
            ResizeOutcome::Deferred(size(300, 60))
        );
        assert_eq!(s.pending_resize(), Some(size(300, 60)));
        s.mark_applied(size(300, 60));
        assert_eq!(s.applied_buffer_size(), Some(size(300, 60)));
        assert_eq!(s.pending_resize(), None);
    }

    #[test]
    fn unconfirmed_resize_stays_pending() {
        let mut s = SurfaceManager::new();
        s.configure(DisplaySize::new(64.0, 64.0), 1.0, 1.0, false);
        s.mark_applied(size(64, 64));
        assert_eq!(
            s.resize(DisplaySize::new(128.0, 64.0)),
            ResizeOutcome::Applied(size(128, 64))
        );
        // backend never confirmed, so the same request is not "unchanged"
        assert_eq!(
            s.resize(DisplaySize::new(128.0, 64.0)),
            ResizeOutcome::Applied(size(128, 64))
        );
        assert_eq!(s.pending_resize(), Some(size(128, 64)));
        assert_eq!(s.applied_buffer_size(), Some(size(64, 64)));
    }

    #[test]
    fn resizing_back_clears_pending() {
        let mut s = SurfaceManager::new();
        s.configure(DisplaySize::new(100.0, 100.0), 1.0, 1.0, true);
        s.mark_applied(size(100, 100));
        s.resize(DisplaySize::new(120.0, 100.0));
        assert_eq!(s.resize(DisplaySize::new(100.0, 100.0)), ResizeOutcome::Unchanged);
        assert_eq!(s.pending_resize(), None);
    }

    #[test]
    fn continuous_same_size_is_unchanged() {
        let mut s = SurfaceManager::new();
        let out = s.configure(DisplaySize::new(64.0, 64.0), 1.0, 1.0, false);
        assert_eq!(out, ResizeOutcome::Applied(size(64, 64)));
        s.mark_applied(size(64, 64));
        assert_eq!(s.resize(DisplaySize::new(64.4, 64.9)), ResizeOutcome::Unchanged);
    }
}
