//! Scene lifecycle against a platform backend.
//!
//! The engine owns one [`SceneSession`] and drives the backend through a fixed
//! order on mount and teardown, so a backend never has a listener, observer or
//! surface alive without a session behind it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::PreviewResult;
use crate::scene::pointer::PointerCell;
use crate::scene::session::{FrameView, SceneGeometry, SceneParams, SceneSession, SurfaceSize};
use crate::scene::style::SceneStyle;
use crate::scroll::ScrollCell;

/// Latest observed container size, drained once per frame.
pub type ResizeInbox = Rc<Cell<Option<SurfaceSize>>>;

/// Platform half of the scene: surface, listeners, frame scheduling, drawing.
pub trait SceneBackend {
    /// Current content box of the container.
    fn container_size(&self) -> SurfaceSize;

    fn attach_surface(&mut self, size: SurfaceSize) -> PreviewResult<()>;
    fn resize_surface(&mut self, size: SurfaceSize);
    fn detach_surface(&mut self);

    fn observe_resize(&mut self, inbox: ResizeInbox);
    fn disconnect_resize(&mut self);

    fn listen_pointer(&mut self, pointer: PointerCell);
    fn unlisten_pointer(&mut self);

    fn upload_geometry(&mut self, geometry: &SceneGeometry);
    fn release_geometry(&mut self);

    /// Schedule one call to [`SceneEngine::frame`].
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);

    fn render(&mut self, view: &FrameView<'_>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    /// Surface attached, frames running.
    Live,
    /// No surface could be obtained; the container stays empty.
    Blank,
    /// Torn down. Terminal.
    Released,
}

pub struct SceneEngine<B: SceneBackend> {
    backend: B,
    phase: EnginePhase,
    params: SceneParams,
    session: Option<SceneSession>,
    pointer: PointerCell,
    scroll: ScrollCell,
    resize: ResizeInbox,
    started_at: Option<f64>,
    frames: u64,
}

impl<B: SceneBackend> SceneEngine<B> {
    pub fn mount(mut backend: B, params: SceneParams, scroll: ScrollCell) -> Self {
        let pointer = PointerCell::new();
        let resize: ResizeInbox = Rc::new(Cell::new(None));
        let size = backend.container_size();

        let mut engine = if let Err(e) = backend.attach_surface(size) {
            log::warn!("[scene] no drawing surface, leaving backdrop blank: {e}");
            Self {
                backend,
                phase: EnginePhase::Blank,
                params,
                session: None,
                pointer,
                scroll,
                resize,
                started_at: None,
                frames: 0,
            }
        } else {
            backend.observe_resize(resize.clone());
            backend.listen_pointer(pointer.clone());
            let session = SceneSession::new(&params, size);
            backend.upload_geometry(&session.geometry());
            Self {
                backend,
                phase: EnginePhase::Live,
                params,
                session: Some(session),
                pointer,
                scroll,
                resize,
                started_at: None,
                frames: 0,
            }
        };
        if engine.phase == EnginePhase::Live {
            engine.backend.request_frame();
            log::info!(
                "[scene] mounted {} at {}x{}",
                engine.params.style,
                size.width,
                size.height
            );
        }
        engine
    }

    /// Mount behind `Rc<RefCell<_>>`, handing the backend a weak handle it can
    /// use from its frame callback.
    pub fn mount_shared(
        params: SceneParams,
        scroll: ScrollCell,
        make_backend: impl FnOnce(Weak<RefCell<Self>>) -> B,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak| RefCell::new(Self::mount(make_backend(weak.clone()), params, scroll)))
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase == EnginePhase::Live
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn style(&self) -> SceneStyle {
        self.params.style
    }

    pub fn session(&self) -> Option<&SceneSession> {
        self.session.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn pointer(&self) -> &PointerCell {
        &self.pointer
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Queue a container size; applied at the start of the next frame.
    pub fn notify_resize(&self, size: SurfaceSize) {
        self.resize.set(Some(size));
    }

    /// One animation frame. `timestamp_ms` is the host's frame clock.
    pub fn frame(&mut self, timestamp_ms: f64) {
        if self.phase != EnginePhase::Live {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(size) = self.resize.take() {
            if !size.is_empty() {
                self.backend.resize_surface(size);
                session.set_viewport(size.width, size.height);
            }
        }
        let start = *self.started_at.get_or_insert(timestamp_ms);
        let t = ((timestamp_ms - start) / 1000.0) as f32;

        session.advance(t, self.pointer.get(), self.scroll.get());
        let view = session.frame_view();
        self.backend.render(&view);
        self.frames += 1;
        self.backend.request_frame();
    }

    /// Release everything in reverse mount order. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        match self.phase {
            EnginePhase::Released => return,
            EnginePhase::Blank => {}
            EnginePhase::Live => {
                self.backend.cancel_frame();
                self.backend.unlisten_pointer();
                self.backend.disconnect_resize();
                self.backend.detach_surface();
                self.backend.release_geometry();
                log::info!("[scene] released {} after {} frames", self.params.style, self.frames);
            }
        }
        self.session = None;
        self.resize.set(None);
        self.phase = EnginePhase::Released;
    }
}

impl<B: SceneBackend> Drop for SceneEngine<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// What a scene is rebuilt on. The seed is deliberately absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneKey {
    pub style: SceneStyle,
    pub primary: String,
}

/// Holds at most one engine, rebuilding only when the key changes.
pub struct SceneSlot<B: SceneBackend> {
    current: Option<(SceneKey, Rc<RefCell<SceneEngine<B>>>)>,
}

impl<B: SceneBackend> Default for SceneSlot<B> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<B: SceneBackend> SceneSlot<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&SceneKey> {
        self.current.as_ref().map(|(k, _)| k)
    }

    pub fn engine(&self) -> Option<&Rc<RefCell<SceneEngine<B>>>> {
        self.current.as_ref().map(|(_, e)| e)
    }

    /// Make sure an engine for `key` is mounted. The old engine is torn down
    /// before `build` runs. Returns whether a rebuild happened.
    pub fn ensure(
        &mut self,
        key: SceneKey,
        build: impl FnOnce(&SceneKey) -> Rc<RefCell<SceneEngine<B>>>,
    ) -> bool {
        if self.key() == Some(&key) {
            return false;
        }
        self.clear();
        let engine = build(&key);
        self.current = Some((key, engine));
        true
    }

    pub fn clear(&mut self) {
        if let Some((_, engine)) = self.current.take() {
            match engine.try_borrow_mut() {
                Ok(mut engine) => engine.teardown(),
                Err(_) => log::warn!("[scene] engine busy during clear; releasing on drop"),
            }
        }
    }
}

impl<B: SceneBackend> Drop for SceneSlot<B> {
    fn drop(&mut self) {
        self.clear();
    }
}
