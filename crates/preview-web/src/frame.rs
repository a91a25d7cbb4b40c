use gloo::render::{request_animation_frame, AnimationFrame};

use crate::constants::MAX_FRAME_DT_SEC;

/// At most one pending `requestAnimationFrame` callback. Dropping the slot (or
/// scheduling over it) cancels whatever was pending.
#[derive(Default)]
pub struct FrameSlot {
    handle: Option<AnimationFrame>,
}

impl FrameSlot {
    pub fn schedule(&mut self, callback: impl FnOnce(f64) + 'static) {
        self.handle = Some(request_animation_frame(callback));
    }

    pub fn cancel(&mut self) {
        self.handle = None;
    }
}

/// Turns rAF timestamps into clamped per-frame deltas.
#[derive(Default, Clone, Copy)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        dt.clamp(0.0, MAX_FRAME_DT_SEC)
    }
}
