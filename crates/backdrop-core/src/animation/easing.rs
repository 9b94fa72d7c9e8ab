/// Monotonic remapping of linear segment progress.
///
/// Every curve fixes the endpoints (`apply(0) == 0`, `apply(1) == 1`) and never
/// decreases over `[0, 1]`. Inputs outside that range are clamped first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    Smoothstep,
    QuadInOut,
    CubicInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::Smoothstep,
        Easing::QuadInOut,
        Easing::CubicInOut,
    ];

    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    /// Look up a curve by the names hosts use in markup (`"ease-in-out"` etc).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "smooth" | "smoothstep" => Some(Self::Smoothstep),
            "quad" | "ease-in-out-quad" | "quad-in-out" => Some(Self::QuadInOut),
            "cubic" | "ease-in-out" | "ease-in-out-cubic" | "cubic-in-out" => {
                Some(Self::CubicInOut)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for e in Easing::ALL {
            assert_eq!(e.apply(0.0), 0.0, "{e:?} f(0)");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?} f(1)");
        }
    }

    #[test]
    fn curves_never_decrease() {
        for e in Easing::ALL {
            let mut prev = e.apply(0.0);
            for i in 1..=1000 {
                let v = e.apply(i as f32 / 1000.0);
                assert!(v + 1e-6 >= prev, "{e:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        for e in Easing::ALL {
            assert_eq!(e.apply(-3.0), 0.0);
            assert!((e.apply(7.5) - 1.0).abs() < 1e-6);
            assert_eq!(e.apply(f32::NAN), 0.0);
        }
    }

    #[test]
    fn smoothstep_midpoint() {
        assert!((Easing::Smoothstep.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::Smoothstep.apply(0.25) - 0.15625).abs() < 1e-6);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(Easing::from_name("Linear"), Some(Easing::Linear));
        assert_eq!(Easing::from_name("ease-in-out"), Some(Easing::CubicInOut));
        assert_eq!(Easing::from_name("smoothstep"), Some(Easing::Smoothstep));
        assert_eq!(Easing::from_name("bounce"), None);
    }
}
