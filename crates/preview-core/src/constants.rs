// Scene, scroll and layout tuning constants shared with the web frontend.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 30.0;

// Surface
pub const MAX_PIXEL_RATIO: f64 = 1.5; // caps devicePixelRatio for fill-rate
pub const FOG_DENSITY: f32 = 0.005;

// Colour
pub const FALLBACK_PRIMARY: &str = "#8b5cf6";
pub const MIN_SCENE_LIGHTNESS: f32 = 0.6; // HSL lightness floor against the black backdrop
pub const GRID_LINE_COLOR: [f32; 3] = [0.2, 0.2, 0.2]; // #333333

// Particle cloud
pub const PARTICLE_COUNT_DENSE: usize = 4000; // `particles` style
pub const PARTICLE_COUNT_SPARSE: usize = 2000; // every other style
pub const PARTICLE_SPREAD: f32 = 250.0; // side of the spawn cube
pub const PARTICLE_SIZE_DENSE: f32 = 2.5;
pub const PARTICLE_SIZE_SPARSE: f32 = 2.0;
pub const PARTICLE_SPEED_MIN: f32 = 0.02;
pub const PARTICLE_SPEED_SPAN: f32 = 0.05;
pub const PARTICLE_CEILING: f32 = 100.0;
pub const PARTICLE_FLOOR: f32 = -100.0;
pub const PARTICLE_SPIN_PER_SEC: f32 = 0.05;
pub const PARTICLE_POINT_SIZE: f32 = 0.8;
pub const PARTICLE_OPACITY: f32 = 0.9;

// Orb
pub const ORB_WIRE_RADIUS: f32 = 6.0;
pub const ORB_WIRE_DETAIL: u32 = 2;
pub const ORB_WIRE_OPACITY: f32 = 0.4;
pub const ORB_GLOW_RADIUS: f32 = 5.0;
pub const ORB_GLOW_DETAIL: u32 = 1;
pub const ORB_GLOW_OPACITY: f32 = 0.15;
pub const ORB_SPIN_X_PER_SEC: f32 = 0.2;
pub const ORB_SPIN_Y_PER_SEC: f32 = 0.1;
pub const ORB_PULSE_RATE: f32 = 2.0;
pub const ORB_PULSE_DEPTH: f32 = 0.1;

// Grid lattice
pub const GRID_SIZE: f32 = 200.0;
pub const GRID_DIVISIONS: u32 = 60;
pub const GRID_Y: f32 = -20.0;

// Waves height-field
pub const WAVE_FREQUENCY: f32 = 0.1;
pub const WAVE_AMPLITUDE: f32 = 5.0;

// Pointer follower
pub const POINTER_DAMPING: f32 = 0.08; // fraction of the remaining distance per frame
pub const MARKER_RANGE_X: f32 = 30.0;
pub const MARKER_RANGE_Y: f32 = 20.0;
pub const MARKER_Z: f32 = 10.0;
pub const MARKER_RADIUS: f32 = 0.3;
pub const MARKER_SEGMENTS: u32 = 16;
pub const MARKER_OPACITY: f32 = 0.8;
pub const TILT_PER_POINTER: f32 = 0.2; // radians of group tilt at the viewport edge

// Scroll parallax
pub const SCROLL_CAMERA_DROP: f32 = 0.02; // world units per scrolled pixel
pub const SCROLL_CAMERA_ROLL: f32 = 0.0001; // radians per scrolled pixel

// Scroll smoothing
pub const SCROLL_DURATION_SEC: f32 = 1.5;
pub const SCROLL_WHEEL_MULTIPLIER: f32 = 0.9;
pub const SCROLL_TOUCH_MULTIPLIER: f32 = 2.0;
pub const SCROLL_SETTLE_EPSILON: f32 = 0.5; // pixels
pub const REVEAL_MARGIN_PX: f32 = 100.0;

// Device frames (CSS pixels)
pub const TABLET_WIDTH_PX: u32 = 768;
pub const MOBILE_WIDTH_PX: u32 = 375;
pub const FRAMED_HEIGHT_VH: u32 = 85;

// Shell
pub const SAVE_DELAY_MS: u32 = 500;
pub const GALLERY_MAX_IMAGES: usize = 5;
