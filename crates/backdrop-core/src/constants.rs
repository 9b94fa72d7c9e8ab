// Engine-wide limits and defaults shared by the renderer and the built-in kernels.

// Point animation
pub const MAX_POINTS: usize = 16; // hard cap on animated points per engine
pub const MIN_SEGMENT_DURATION_SEC: f32 = 0.01; // floor for motion segment length
pub const DEFAULT_SEGMENT_DURATION_SEC: f32 = 6.0;
pub const DEFAULT_COLOR_SPEED: f32 = 0.1; // color cycles per second
pub const DEFAULT_BOUNDS: [f32; 4] = [-1.0, 1.0, -1.0, 1.0]; // min_x, max_x, min_y, max_y

// Surface sizing
pub const MIN_RESOLUTION_SCALE: f32 = 0.01;
pub const MAX_RESOLUTION_SCALE: f32 = 8.0;
pub const MIN_BUFFER_PX: u32 = 1;

// Built-in parameters present in every kernel's map
pub const PARAM_TIME: &str = "u_time";
pub const PARAM_RESOLUTION: &str = "u_resolution";
