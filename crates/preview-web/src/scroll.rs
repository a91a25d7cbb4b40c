//! Smooth scrolling for the preview's scroll container.
//!
//! Wheel input is intercepted and eased through [`ScrollSmoother`]; touch drags
//! move the page immediately. Every applied offset is published to the shared
//! [`ScrollCell`] so the scene camera follows, and sections marked for reveal
//! get their class once they cross the reveal line.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use preview_core::scroll::{RevealTracker, ScrollCell, ScrollSmoother};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::REVEALED_CLASS;
use crate::dom;
use crate::frame::{FrameClock, FrameSlot};
use crate::input;

struct Inner {
    container: web::HtmlElement,
    cell: ScrollCell,
    smoother: RefCell<ScrollSmoother>,
    reveal: RefCell<RevealTracker>,
    targets: Vec<web::Element>,
    frame: RefCell<FrameSlot>,
    clock: Cell<FrameClock>,
    touch_y: Cell<Option<f32>>,
    listeners: RefCell<Vec<EventListener>>,
}

/// Owns the listeners and frame loop; dropping it stops both.
pub struct ScrollCoordinator {
    inner: Rc<Inner>,
}

fn scroll_limit(container: &web::HtmlElement) -> f32 {
    (container.scroll_height() - container.client_height()).max(0) as f32
}

impl ScrollCoordinator {
    pub fn bind(container: web::HtmlElement, cell: ScrollCell, targets: Vec<web::Element>) -> Self {
        let mut smoother = ScrollSmoother::new(scroll_limit(&container));
        smoother.sync_native(container.scroll_top() as f32);
        cell.set(smoother.current());

        let inner = Rc::new(Inner {
            reveal: RefCell::new(RevealTracker::new(targets.len())),
            container,
            cell,
            smoother: RefCell::new(smoother),
            targets,
            frame: RefCell::new(FrameSlot::default()),
            clock: Cell::new(FrameClock::default()),
            touch_y: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        let active = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        };
        let weak = Rc::downgrade(&inner);
        let mut listeners = Vec::with_capacity(5);
        listeners.push(EventListener::new_with_options(&inner.container, "wheel", active, {
            let weak = weak.clone();
            move |event| {
                let (Some(inner), Some(wheel)) = (weak.upgrade(), event.dyn_ref::<web::WheelEvent>())
                else {
                    return;
                };
                event.prevent_default();
                let page = inner.container.client_height() as f32;
                inner
                    .smoother
                    .borrow_mut()
                    .wheel(input::wheel_delta_px(wheel, page));
            }
        }));
        listeners.push(EventListener::new(&inner.container, "touchstart", {
            let weak = weak.clone();
            move |event| {
                if let (Some(inner), Some(touch)) = (weak.upgrade(), event.dyn_ref::<web::TouchEvent>()) {
                    inner.touch_y.set(input::first_touch_y(touch));
                }
            }
        }));
        listeners.push(EventListener::new_with_options(&inner.container, "touchmove", active, {
            let weak = weak.clone();
            move |event| {
                let (Some(inner), Some(touch)) = (weak.upgrade(), event.dyn_ref::<web::TouchEvent>())
                else {
                    return;
                };
                let Some(y) = input::first_touch_y(touch) else {
                    return;
                };
                if let Some(last) = inner.touch_y.replace(Some(y)) {
                    event.prevent_default();
                    let offset = {
                        let mut smoother = inner.smoother.borrow_mut();
                        smoother.touch_drag(last - y);
                        smoother.current()
                    };
                    inner.apply(offset);
                }
            }
        }));
        listeners.push(EventListener::new(&inner.container, "touchend", {
            let weak = weak.clone();
            move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.touch_y.set(None);
                }
            }
        }));
        // keyboard, scrollbar and programmatic scrolling
        listeners.push(EventListener::new(&inner.container, "scroll", move |_| {
            if let Some(inner) = weak.upgrade() {
                let offset = {
                    let mut smoother = inner.smoother.borrow_mut();
                    smoother.sync_native(inner.container.scroll_top() as f32);
                    smoother.current()
                };
                inner.cell.set(offset);
            }
        }));
        *inner.listeners.borrow_mut() = listeners;

        inner.reveal_visible();
        Inner::schedule(&inner);
        log::info!("[scroll] bound with {} reveal targets", inner.targets.len());
        Self { inner }
    }
}

impl Inner {
    fn schedule(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.frame.borrow_mut().schedule(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                inner.tick(timestamp);
            }
        });
    }

    fn tick(self: &Rc<Self>, timestamp_ms: f64) {
        let mut clock = self.clock.get();
        let dt = clock.tick(timestamp_ms);
        self.clock.set(clock);

        let moved = {
            let mut smoother = self.smoother.borrow_mut();
            smoother.set_limit(scroll_limit(&self.container));
            smoother.is_animating().then(|| smoother.advance(dt))
        };
        if let Some(offset) = moved {
            self.apply(offset);
        }
        self.reveal_visible();
        self.schedule();
    }

    fn apply(&self, offset: f32) {
        self.container.set_scroll_top(offset.round() as i32);
        self.cell.set(offset);
    }

    fn reveal_visible(&self) {
        if self.reveal.borrow().is_complete() {
            return;
        }
        let origin = self.container.get_bounding_client_rect().top();
        let tops: Vec<f32> = self
            .targets
            .iter()
            .map(|t| (t.get_bounding_client_rect().top() - origin) as f32)
            .collect();
        let fresh = self
            .reveal
            .borrow_mut()
            .update(&tops, self.container.client_height() as f32);
        for i in fresh {
            if let Some(target) = self.targets.get(i) {
                dom::set_class(target, REVEALED_CLASS, true);
            }
        }
    }
}

impl Drop for ScrollCoordinator {
    fn drop(&mut self) {
        self.inner.frame.borrow_mut().cancel();
        self.inner.listeners.borrow_mut().clear();
    }
}
