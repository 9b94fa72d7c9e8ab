//! Built-in kernels.

mod plasma;
mod points;

pub use plasma::PlasmaKernel;
pub use points::PointsKernel;

use crate::kernel::VisualKernel;

pub static POINTS_WGSL: &str = include_str!("../../shaders/points.wgsl");
pub static PLASMA_WGSL: &str = include_str!("../../shaders/plasma.wgsl");

pub const BUILTIN_NAMES: [&str; 2] = [PointsKernel::NAME, PlasmaKernel::NAME];

/// Construct a built-in kernel by name, for hosts that select effects from
/// markup or configuration strings.
pub fn by_name(name: &str) -> Option<Box<dyn VisualKernel>> {
    match name.trim().to_ascii_lowercase().as_str() {
        PointsKernel::NAME | "mesh" | "gradient" => Some(Box::new(PointsKernel::default())),
        PlasmaKernel::NAME => Some(Box::new(PlasmaKernel::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_resolves_by_name() {
        for name in BUILTIN_NAMES {
            let kernel = by_name(name).expect("builtin");
            assert_eq!(kernel.name(), name);
            assert!(kernel.shader_body().contains("fn fs_main"));
        }
        assert!(by_name("voronoi").is_none());
    }
}
