use crate::params::UniformLayout;

/// Binding and vertex stage shared by every kernel: a single oversized
/// triangle covering the viewport, with `uv` in `[0, 1]²` (y up).
const PRELUDE: &str = r#"
@group(0) @binding(0) var<uniform> u: Params;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VsOut {
    var corners = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    let p = corners[vi];
    var out: VsOut;
    out.pos = vec4<f32>(p, 0.0, 1.0);
    out.uv = p * 0.5 + vec2<f32>(0.5, 0.5);
    return out;
}
"#;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Assemble a complete WGSL module from a kernel's fragment body.
///
/// The body must define `fs_main(in: VsOut) -> @location(0) vec4<f32>` and
/// reads its parameters through `u.<name>`.
pub fn compose_shader(layout: &UniformLayout, kernel_body: &str) -> String {
    let mut src = layout.wgsl_struct();
    src.push_str(PRELUDE);
    src.push('\n');
    src.push_str(kernel_body);
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamMap;

    #[test]
    fn composed_source_declares_struct_before_binding() {
        let layout = UniformLayout::from_params(&ParamMap::with_builtins());
        let src = compose_shader(&layout, "@fragment fn fs_main(in: VsOut) -> @location(0) vec4<f32> { return vec4<f32>(1.0); }");
        let s = src.find("struct Params").unwrap();
        let b = src.find("var<uniform> u: Params").unwrap();
        let f = src.find("fn fs_main").unwrap();
        assert!(s < b && b < f);
        assert!(src.contains("fn vs_main"));
    }
}
