//! Smoothed scroll offset shared with the scene, plus on-scroll reveal.
//!
//! The coordinator on the web side feeds raw wheel, touch and native scroll
//! input into a [`ScrollSmoother`], advances it once per animation frame and
//! publishes the result through a [`ScrollCell`]. The scene reads the cell in
//! its own frame loop; a value one frame stale is fine.

use std::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::constants::{
    REVEAL_MARGIN_PX, SCROLL_DURATION_SEC, SCROLL_SETTLE_EPSILON, SCROLL_TOUCH_MULTIPLIER,
    SCROLL_WHEEL_MULTIPLIER,
};

/// Single-writer, multi-reader scroll offset in CSS pixels.
#[derive(Clone, Debug, Default)]
pub struct ScrollCell(Rc<Cell<f32>>);

impl ScrollCell {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, offset: f32) {
        self.0.set(offset);
    }
}

/// `min(1, 1.001 - 2^(-10t))`, saturating at `t >= 1`.
pub fn ease_out_expo(t: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    (1.001 - 2f32.powf(-10.0 * t.max(0.0))).min(1.0)
}

/// Eased scroll position chasing a clamped target.
///
/// Every retarget restarts the ease from the current position, so the output
/// moves monotonically toward the latest target and never passes it.
#[derive(Clone, Debug)]
pub struct ScrollSmoother {
    current: f32,
    target: f32,
    from: f32,
    elapsed: f32,
    duration: f32,
    limit: f32,
    animating: bool,
}

impl Default for ScrollSmoother {
    fn default() -> Self {
        Self::new(f32::MAX)
    }
}

impl ScrollSmoother {
    pub fn new(limit: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            from: 0.0,
            elapsed: 0.0,
            duration: SCROLL_DURATION_SEC,
            limit: limit.max(0.0),
            animating: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Maximum scroll offset (`scrollHeight - clientHeight`).
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.min(self.limit);
        self.current = self.current.min(self.limit);
        self.from = self.from.min(self.limit);
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.scroll_to(self.target + delta_y * SCROLL_WHEEL_MULTIPLIER);
    }

    /// Finger drags follow immediately; `delta` is the upward finger travel.
    pub fn touch_drag(&mut self, delta: f32) {
        let next = self.clamp(self.current + delta * SCROLL_TOUCH_MULTIPLIER);
        self.current = next;
        self.target = next;
        self.animating = false;
    }

    pub fn scroll_to(&mut self, target: f32) {
        let target = self.clamp(target);
        if target == self.target && (self.animating || target == self.current) {
            return;
        }
        self.target = target;
        self.from = self.current;
        self.elapsed = 0.0;
        self.animating = true;
    }

    /// Adopt a scroll position the browser produced on its own (scrollbar
    /// drag, keyboard). Ignored while an eased scroll is in flight, since
    /// that movement is ours.
    pub fn sync_native(&mut self, top: f32) {
        if self.animating {
            return;
        }
        let top = self.clamp(top);
        self.current = top;
        self.target = top;
    }

    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        if !self.animating {
            return self.current;
        }
        self.elapsed += dt_sec.max(0.0);
        let progress = (self.elapsed / self.duration).min(1.0);
        self.current = self.from + (self.target - self.from) * ease_out_expo(progress);
        if progress >= 1.0 || (self.target - self.current).abs() < SCROLL_SETTLE_EPSILON {
            self.current = self.target;
            self.animating = false;
        }
        self.current
    }

    fn clamp(&self, v: f32) -> f32 {
        v.clamp(0.0, self.limit)
    }
}

/// Tracks which reveal-marked sections have entered the viewport. Each
/// section is revealed at most once.
#[derive(Clone, Debug, Default)]
pub struct RevealTracker {
    revealed: Vec<bool>,
}

impl RevealTracker {
    pub fn new(count: usize) -> Self {
        Self {
            revealed: vec![false; count],
        }
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    /// Nothing left to reveal; callers can stop measuring targets.
    pub fn is_complete(&self) -> bool {
        self.revealed.iter().all(|&r| r)
    }

    /// `tops` are section top edges relative to the viewport top. Returns the
    /// indices that crossed `viewport_height - REVEAL_MARGIN_PX` on this call.
    pub fn update(&mut self, tops: &[f32], viewport_height: f32) -> SmallVec<[usize; 4]> {
        if self.revealed.len() < tops.len() {
            self.revealed.resize(tops.len(), false);
        }
        let line = viewport_height - REVEAL_MARGIN_PX;
        let mut fresh = SmallVec::new();
        for (i, &top) in tops.iter().enumerate() {
            if !self.revealed[i] && top < line {
                self.revealed[i] = true;
                fresh.push(i);
            }
        }
        fresh
    }
}
