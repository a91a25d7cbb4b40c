use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::constants::POINTER_DAMPING;

/// Last pointer position in normalized device coordinates (`[-1, 1]`, +Y up).
///
/// Written by the pointer listener, read once per frame by the scene.
#[derive(Clone, Debug, Default)]
pub struct PointerCell(Rc<Cell<Vec2>>);

impl PointerCell {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> Vec2 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, ndc: Vec2) {
        self.0.set(ndc);
    }
}

/// Map client-space pixels to NDC against a viewport of `width` x `height`.
#[inline]
pub fn client_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

/// Exponential follower: each step closes a fixed fraction of the gap.
#[derive(Clone, Debug)]
pub struct PointerDamper {
    current: Vec2,
    factor: f32,
}

impl Default for PointerDamper {
    fn default() -> Self {
        Self {
            current: Vec2::ZERO,
            factor: POINTER_DAMPING,
        }
    }
}

impl PointerDamper {
    pub fn step(&mut self, target: Vec2) -> Vec2 {
        self.current += (target - self.current) * self.factor;
        self.current
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        assert_eq!(client_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(client_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(client_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
        assert_eq!(client_to_ndc(5.0, 5.0, 0.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn damper_approaches_without_jumping() {
        let mut d = PointerDamper::default();
        let target = Vec2::new(1.0, -1.0);
        let first = d.step(target);
        assert!((first.x - POINTER_DAMPING).abs() < 1e-6);
        let mut prev = first.x;
        for _ in 0..200 {
            let p = d.step(target);
            assert!(p.x >= prev && p.x <= 1.0);
            prev = p.x;
        }
        assert!((d.current() - target).length() < 1e-3);
    }

    #[test]
    fn cell_is_shared_between_clones() {
        let a = PointerCell::new();
        let b = a.clone();
        b.set(Vec2::new(0.5, 0.25));
        assert_eq!(a.get(), Vec2::new(0.5, 0.25));
    }
}
