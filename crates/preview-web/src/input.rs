use glam::Vec2;
use preview_core::scene::client_to_ndc;
use web_sys as web;

use crate::constants::WHEEL_LINE_PX;

// ---------------- Pointer helpers ----------------

/// Pointer position in window-relative NDC (y up). The backdrop reacts to the
/// pointer anywhere on the page, not just over its container.
#[inline]
pub fn pointer_window_ndc(ev: &web::PointerEvent) -> Option<Vec2> {
    let w = web::window()?;
    let width = w.inner_width().ok()?.as_f64()? as f32;
    let height = w.inner_height().ok()?.as_f64()? as f32;
    Some(client_to_ndc(ev.client_x() as f32, ev.client_y() as f32, width, height))
}

// ---------------- Scroll input helpers ----------------

/// Wheel delta in pixels regardless of the event's delta mode.
#[inline]
pub fn wheel_delta_px(ev: &web::WheelEvent, page_height: f32) -> f32 {
    let dy = ev.delta_y() as f32;
    match ev.delta_mode() {
        web::WheelEvent::DOM_DELTA_LINE => dy * WHEEL_LINE_PX,
        web::WheelEvent::DOM_DELTA_PAGE => dy * page_height,
        _ => dy,
    }
}

#[inline]
pub fn first_touch_y(ev: &web::TouchEvent) -> Option<f32> {
    ev.touches().get(0).map(|t| t.client_y() as f32)
}
