// All tunable constants in one place.

// Fire pool
pub const POOL_SIZE: usize = 150;
pub const DEFAULT_SURFACE_WIDTH: f32 = 300.0;
pub const DEFAULT_SURFACE_HEIGHT: f32 = 400.0;
pub const BURN_SURFACE_WIDTH: f32 = 320.0;
pub const BURN_SURFACE_HEIGHT: f32 = 384.0;

// Particle spawn ranges (per-frame units)
pub const PARTICLE_DRIFT_MAX: f32 = 1.0;
pub const PARTICLE_RISE_MIN: f32 = 2.0;
pub const PARTICLE_RISE_MAX: f32 = 5.0;
pub const PARTICLE_LIFE_MIN: f32 = 40.0;
pub const PARTICLE_LIFE_MAX: f32 = 100.0;
pub const PARTICLE_SIZE_MIN: f32 = 10.0;
pub const PARTICLE_SIZE_MAX: f32 = 25.0;
pub const PARTICLE_DECAY_MIN: f32 = 0.5;
pub const PARTICLE_DECAY_MAX: f32 = 1.0;
pub const PARTICLE_SHRINK: f32 = 0.1;
pub const PARTICLE_TURBULENCE: f32 = 0.1;

// Color tiers by life ratio
pub const HOT_CORE_RATIO: f32 = 0.8;
pub const FLAME_BODY_RATIO: f32 = 0.5;

// Trail overlay painted each frame instead of a clear
pub const TRAIL_ALPHA: f32 = 0.1;

// Session timing (milliseconds)
pub const SHAKE_DURATION_MS: f64 = 2000.0;
pub const BURN_DURATION_MS: f64 = 3000.0;

// Haptics (milliseconds)
pub const SHAKE_PULSE_MS: u32 = 200;
pub const REVEAL_PATTERN_MS: [u32; 3] = [100, 50, 100];

// Visuals
pub const CHAR_DURATION_S: f32 = 2.8;
pub const WOBBLE_PERIOD_S: f32 = 0.5;
pub const WOBBLE_DEGREES: f32 = 10.0;
pub const CARD_WIDTH: f32 = 256.0;
pub const CARD_HEIGHT: f32 = 320.0;

// Host frame loop
pub const MAX_FRAME_MS: f64 = 100.0;
pub const QA_FRAME_MS: f64 = 1000.0 / 60.0;
