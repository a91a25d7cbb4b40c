//! Browser implementation of [`SceneBackend`]: a canvas inside the hero
//! container, WebGPU through [`GpuState`], a `ResizeObserver`, a window-level
//! pointer listener and `requestAnimationFrame` scheduling.
//!
//! WebGPU setup is asynchronous. Until it resolves, geometry, particle data and
//! size changes are parked in [`GpuSlot::Pending`]; a setup that resolves after
//! teardown finds the slot released and drops its device.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use preview_core::error::{PreviewError, PreviewResult};
use preview_core::scene::{
    FrameView, PointInstance, PointerCell, ResizeInbox, SceneBackend, SceneEngine, SceneGeometry,
    SurfaceSize,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crate::dom;
use crate::frame::FrameSlot;
use crate::input;
use crate::render::GpuState;

pub type WebEngine = SceneEngine<WebSceneBackend>;

enum GpuSlot {
    Pending {
        geometry: Option<SceneGeometry>,
        instances: Option<Vec<PointInstance>>,
        size: Option<SurfaceSize>,
    },
    Ready(Box<GpuState>),
    Failed,
    Released,
}

impl GpuSlot {
    fn pending() -> Self {
        GpuSlot::Pending {
            geometry: None,
            instances: None,
            size: None,
        }
    }

    fn settle(&mut self, result: anyhow::Result<GpuState>) {
        match (std::mem::replace(self, GpuSlot::Failed), result) {
            (
                GpuSlot::Pending {
                    geometry,
                    instances,
                    size,
                },
                Ok(mut gpu),
            ) => {
                if let Some(size) = size {
                    let (w, h) = size.backing();
                    gpu.resize_if_needed(w, h);
                }
                if let Some(geometry) = geometry {
                    gpu.upload(&geometry);
                }
                if let Some(points) = instances {
                    gpu.write_instances(&points);
                }
                *self = GpuSlot::Ready(Box::new(gpu));
            }
            (GpuSlot::Pending { .. }, Err(e)) => {
                log::warn!("[scene] WebGPU setup failed, backdrop stays blank: {:?}", e);
            }
            // released while setup was in flight: drop the late device
            (other, _) => *self = other,
        }
    }
}

pub struct WebSceneBackend {
    engine: Weak<RefCell<WebEngine>>,
    container: web::HtmlElement,
    canvas: Option<web::HtmlCanvasElement>,
    gpu: Rc<RefCell<GpuSlot>>,
    resize: Option<(web::ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>,
    pointer: Option<EventListener>,
    frame: FrameSlot,
}

impl WebSceneBackend {
    pub fn new(engine: Weak<RefCell<WebEngine>>, container: web::HtmlElement) -> Self {
        Self {
            engine,
            container,
            canvas: None,
            gpu: Rc::new(RefCell::new(GpuSlot::pending())),
            resize: None,
            pointer: None,
            frame: FrameSlot::default(),
        }
    }

    fn create_canvas(&self, size: SurfaceSize) -> anyhow::Result<web::HtmlCanvasElement> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let canvas = document
            .create_element("canvas")
            .map_err(dom::js_err)?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        canvas.set_class_name("scene-canvas");
        let _ = canvas.set_attribute(
            "style",
            "position:absolute;inset:0;width:100%;height:100%;pointer-events:none",
        );
        dom::sync_canvas_backing_size(&canvas, size);
        self.container.append_child(&canvas).map_err(dom::js_err)?;
        Ok(canvas)
    }
}

impl SceneBackend for WebSceneBackend {
    fn container_size(&self) -> SurfaceSize {
        dom::container_size(&self.container)
    }

    fn attach_surface(&mut self, size: SurfaceSize) -> PreviewResult<()> {
        if !dom::has_webgpu() {
            return Err(PreviewError::surface("WebGPU is not available"));
        }
        let canvas = self
            .create_canvas(size)
            .map_err(|e| PreviewError::surface(e.to_string()))?;

        let slot = Rc::downgrade(&self.gpu);
        let for_gpu = canvas.clone();
        spawn_local(async move {
            let result = GpuState::new(for_gpu).await;
            let Some(slot) = slot.upgrade() else {
                return;
            };
            match slot.try_borrow_mut() {
                Ok(mut slot) => slot.settle(result),
                Err(_) => log::warn!("[scene] GPU slot busy at setup; dropping device"),
            };
        });
        self.canvas = Some(canvas);
        Ok(())
    }

    fn resize_surface(&mut self, size: SurfaceSize) {
        if let Some(canvas) = &self.canvas {
            dom::sync_canvas_backing_size(canvas, size);
        }
        match &mut *self.gpu.borrow_mut() {
            GpuSlot::Ready(gpu) => {
                let (w, h) = size.backing();
                gpu.resize_if_needed(w, h);
            }
            GpuSlot::Pending { size: pending, .. } => *pending = Some(size),
            _ => {}
        }
    }

    fn detach_surface(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
    }

    fn observe_resize(&mut self, inbox: ResizeInbox) {
        let container = self.container.clone();
        let callback = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            inbox.set(Some(dom::container_size(&container)));
        }) as Box<dyn FnMut(js_sys::Array)>);
        match web::ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.container);
                self.resize = Some((observer, callback));
            }
            Err(e) => log::warn!("[scene] ResizeObserver unavailable: {:?}", e),
        }
    }

    fn disconnect_resize(&mut self) {
        if let Some((observer, _callback)) = self.resize.take() {
            observer.disconnect();
        }
    }

    fn listen_pointer(&mut self, pointer: PointerCell) {
        let Some(window) = web::window() else {
            return;
        };
        self.pointer = Some(EventListener::new(&window, "pointermove", move |event| {
            if let Some(ndc) = event
                .dyn_ref::<web::PointerEvent>()
                .and_then(input::pointer_window_ndc)
            {
                pointer.set(ndc);
            }
        }));
    }

    fn unlisten_pointer(&mut self) {
        self.pointer = None;
    }

    fn upload_geometry(&mut self, geometry: &SceneGeometry) {
        match &mut *self.gpu.borrow_mut() {
            GpuSlot::Ready(gpu) => gpu.upload(geometry),
            GpuSlot::Pending { geometry: parked, .. } => *parked = Some(geometry.clone()),
            _ => {}
        }
    }

    fn release_geometry(&mut self) {
        let mut slot = self.gpu.borrow_mut();
        if let GpuSlot::Ready(gpu) = &mut *slot {
            gpu.release_geometry();
        }
        *slot = GpuSlot::Released;
    }

    fn request_frame(&mut self) {
        let engine = self.engine.clone();
        self.frame.schedule(move |timestamp| {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            // busy means the engine is mid-teardown
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.frame(timestamp);
            };
        });
    }

    fn cancel_frame(&mut self) {
        self.frame.cancel();
    }

    fn render(&mut self, view: &FrameView<'_>) {
        match &mut *self.gpu.borrow_mut() {
            GpuSlot::Ready(gpu) => match gpu.render(view) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
                Err(e) => log::warn!("[scene] frame skipped: {:?}", e),
            },
            GpuSlot::Pending { instances, .. } => {
                if let Some(points) = view.particles {
                    *instances = Some(points.to_vec());
                }
            }
            GpuSlot::Failed | GpuSlot::Released => {}
        }
    }
}
