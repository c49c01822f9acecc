/// Brush diameter range in pixels.
pub const MIN_SIZE_PX: f32 = 1.0;
pub const MAX_SIZE_PX: f32 = 100.0;

/// Flow and spacing never drop to zero (zero flow paints nothing, zero
/// spacing would render on every sub-pixel move).
pub const MIN_FLOW_PCT: f32 = 1.0;
pub const MIN_SPACING_PCT: f32 = 1.0;
pub const MAX_PCT: f32 = 100.0;

/// Pointer speed (px/ms) at which simulated pressure bottoms out.
pub const DEFAULT_MAX_VELOCITY: f32 = sketch_config::DEFAULT_MAX_VELOCITY;

/// Smallest time step used for velocity, guards duplicate timestamps.
pub const MIN_VELOCITY_DT_MS: i64 = 1;

/// Watercolor pigment dilution applied on top of flow.
pub const WATERCOLOR_OPACITY_FACTOR: f32 = 0.7;

/// Queued render calls retained while no raster target is bound.
pub const MAX_PENDING_OPS: usize = 512;
