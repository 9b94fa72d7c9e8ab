use glam::Vec3;

/// Runtime state of the color track: which pair of colors is being blended
/// and how far along the blend is.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ColorTrack {
    current: usize,
    t: f32,
}

impl ColorTrack {
    pub(crate) fn current_index(&self) -> usize {
        self.current
    }

    pub(crate) fn progress(&self) -> f32 {
        self.t
    }

    /// Advance the blend and return the emitted color.
    ///
    /// An empty sequence yields black; a single color is held. The sequence may
    /// have been replaced between frames, so indices are re-wrapped first.
    pub(crate) fn step(&mut self, dt: f32, speed: f32, colors: &[Vec3]) -> Vec3 {
        let len = colors.len();
        if len == 0 {
            self.current = 0;
            self.t = 0.0;
            return Vec3::ZERO;
        }
        self.current %= len;
        if len == 1 {
            self.t = 0.0;
            return colors[0];
        }
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        self.t += dt * speed;
        if !self.t.is_finite() {
            self.t = 0.0;
        }
        if self.t >= 1.0 {
            self.current = (self.current + 1) % len;
            self.t = 0.0;
        }
        let next = (self.current + 1) % len;
        colors[self.current].lerp(colors[next], self.t)
    }
}
