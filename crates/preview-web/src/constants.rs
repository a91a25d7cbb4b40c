// DOM wiring and browser-side tuning constants

// Host page hooks
pub const CONFIG_ELEMENT_ID: &str = "preview-config"; // <script type="application/json">
pub const ROOT_ELEMENT_ID: &str = "preview-root";

// Frame pacing
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp after tab switches

// Wheel normalisation for deltaMode 1 (lines) and 2 (pages)
pub const WHEEL_LINE_PX: f32 = 16.0;

// Notice banner auto-dismiss
pub const NOTICE_TIMEOUT_MS: u32 = 6000;

// Deploy modal log polling
pub const DEPLOY_TICK_MS: u32 = 100;

// Class hooks shared with the host stylesheet
pub const REVEAL_CLASS: &str = "reveal";
pub const REVEALED_CLASS: &str = "revealed";
pub const EDIT_ONLY_CLASS: &str = "edit-only";
pub const EDITING_CLASS: &str = "is-editing";
pub const LOADING_CLASS: &str = "is-loading";
pub const HIDDEN_CLASS: &str = "is-hidden";
