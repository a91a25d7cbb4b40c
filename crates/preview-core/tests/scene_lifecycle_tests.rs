// Host-side lifecycle tests for the scene engine.
// A recording backend stands in for the browser: it counts what is alive so
// teardown and rebuild ordering can be checked without a GPU.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use preview_core::error::{PreviewError, PreviewResult};
use preview_core::scene::{
    EnginePhase, FrameView, PointerCell, ResizeInbox, SceneBackend, SceneEngine, SceneGeometry,
    SceneKey, SceneParams, SceneSlot, SceneStyle, SurfaceSize,
};
use preview_core::scroll::ScrollCell;

#[derive(Default)]
struct Recorder {
    listeners: Cell<i32>,
    observers: Cell<i32>,
    surfaces: Cell<i32>,
    geometries: Cell<i32>,
    frame_pending: Cell<bool>,
    frames_rendered: Cell<u32>,
    surface_size: Cell<(u32, u32)>,
    calls: RefCell<Vec<&'static str>>,
    max_live: Cell<i32>,
}

impl Recorder {
    fn call(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }

    fn bump(&self, counter: &Cell<i32>, by: i32) {
        counter.set(counter.get() + by);
        self.max_live.set(self.max_live.get().max(self.geometries.get()));
    }

    fn all_clear(&self) -> bool {
        self.listeners.get() == 0
            && self.observers.get() == 0
            && self.surfaces.get() == 0
            && self.geometries.get() == 0
            && !self.frame_pending.get()
    }
}

struct FakeBackend {
    rec: Rc<Recorder>,
    container: Rc<Cell<SurfaceSize>>,
    fail_attach: bool,
    inbox: Option<ResizeInbox>,
    pointer: Option<PointerCell>,
}

impl FakeBackend {
    fn new(rec: &Rc<Recorder>, container: &Rc<Cell<SurfaceSize>>) -> Self {
        Self {
            rec: rec.clone(),
            container: container.clone(),
            fail_attach: false,
            inbox: None,
            pointer: None,
        }
    }

    /// What the real ResizeObserver callback does.
    fn fire_resize(&self) {
        if let Some(inbox) = &self.inbox {
            inbox.set(Some(self.container.get()));
        }
    }
}

impl SceneBackend for FakeBackend {
    fn container_size(&self) -> SurfaceSize {
        self.container.get()
    }

    fn attach_surface(&mut self, size: SurfaceSize) -> PreviewResult<()> {
        self.rec.call("attach");
        if self.fail_attach {
            return Err(PreviewError::surface("no context"));
        }
        self.rec.bump(&self.rec.surfaces, 1);
        self.rec.surface_size.set((size.width, size.height));
        Ok(())
    }

    fn resize_surface(&mut self, size: SurfaceSize) {
        self.rec.surface_size.set((size.width, size.height));
    }

    fn detach_surface(&mut self) {
        self.rec.call("detach");
        self.rec.bump(&self.rec.surfaces, -1);
    }

    fn observe_resize(&mut self, inbox: ResizeInbox) {
        self.rec.call("observe");
        self.inbox = Some(inbox);
        self.rec.bump(&self.rec.observers, 1);
    }

    fn disconnect_resize(&mut self) {
        self.rec.call("disconnect");
        self.inbox = None;
        self.rec.bump(&self.rec.observers, -1);
    }

    fn listen_pointer(&mut self, pointer: PointerCell) {
        self.rec.call("listen");
        self.pointer = Some(pointer);
        self.rec.bump(&self.rec.listeners, 1);
    }

    fn unlisten_pointer(&mut self) {
        self.rec.call("unlisten");
        self.pointer = None;
        self.rec.bump(&self.rec.listeners, -1);
    }

    fn upload_geometry(&mut self, _geometry: &SceneGeometry) {
        self.rec.call("upload");
        self.rec.bump(&self.rec.geometries, 1);
    }

    fn release_geometry(&mut self) {
        self.rec.call("release");
        self.rec.bump(&self.rec.geometries, -1);
    }

    fn request_frame(&mut self) {
        self.rec.frame_pending.set(true);
    }

    fn cancel_frame(&mut self) {
        self.rec.call("cancel");
        self.rec.frame_pending.set(false);
    }

    fn render(&mut self, _view: &FrameView<'_>) {
        self.rec.frame_pending.set(false);
        self.rec.frames_rendered.set(self.rec.frames_rendered.get() + 1);
    }
}

const ALL_STYLES: [SceneStyle; 5] = [
    SceneStyle::Orb,
    SceneStyle::Particles,
    SceneStyle::Grid,
    SceneStyle::Waves,
    SceneStyle::Cyber,
];

fn params(style: SceneStyle) -> SceneParams {
    SceneParams {
        style,
        primary: "#8b5cf6".into(),
        seed: 7,
    }
}

fn setup() -> (Rc<Recorder>, Rc<Cell<SurfaceSize>>) {
    (
        Rc::new(Recorder::default()),
        Rc::new(Cell::new(SurfaceSize::new(1280, 720, 1.0))),
    )
}

#[test]
fn mount_then_teardown_leaves_nothing_behind() {
    for style in ALL_STYLES {
        let (rec, container) = setup();
        let mut engine = SceneEngine::mount(
            FakeBackend::new(&rec, &container),
            params(style),
            ScrollCell::new(),
        );
        assert_eq!(engine.phase(), EnginePhase::Live, "{style}");
        assert_eq!(rec.listeners.get(), 1);
        assert_eq!(rec.surfaces.get(), 1);
        assert!(rec.frame_pending.get());

        engine.teardown();
        assert!(rec.all_clear(), "{style} leaked");
        assert_eq!(engine.phase(), EnginePhase::Released);
    }
}

#[test]
fn drop_tears_down() {
    let (rec, container) = setup();
    {
        let _engine = SceneEngine::mount(
            FakeBackend::new(&rec, &container),
            params(SceneStyle::Waves),
            ScrollCell::new(),
        );
        assert_eq!(rec.geometries.get(), 1);
    }
    assert!(rec.all_clear());
}

#[test]
fn mount_and_teardown_follow_the_fixed_order() {
    let (rec, container) = setup();
    let mut engine = SceneEngine::mount(
        FakeBackend::new(&rec, &container),
        params(SceneStyle::Orb),
        ScrollCell::new(),
    );
    engine.teardown();
    engine.teardown();
    assert_eq!(
        *rec.calls.borrow(),
        vec![
            "attach",
            "observe",
            "listen",
            "upload",
            "cancel",
            "unlisten",
            "disconnect",
            "detach",
            "release"
        ]
    );
}

#[test]
fn attach_failure_leaves_a_blank_engine() {
    let (rec, container) = setup();
    let mut backend = FakeBackend::new(&rec, &container);
    backend.fail_attach = true;
    let mut engine = SceneEngine::mount(backend, params(SceneStyle::Particles), ScrollCell::new());
    assert_eq!(engine.phase(), EnginePhase::Blank);
    assert!(engine.session().is_none());
    assert!(rec.all_clear());

    engine.frame(16.0);
    assert_eq!(rec.frames_rendered.get(), 0);
    engine.teardown();
    assert_eq!(*rec.calls.borrow(), vec!["attach"]);
}

#[test]
fn frames_render_and_reschedule_until_teardown() {
    let (rec, container) = setup();
    let mut engine = SceneEngine::mount(
        FakeBackend::new(&rec, &container),
        params(SceneStyle::Particles),
        ScrollCell::new(),
    );
    for i in 0..5 {
        engine.frame(i as f64 * 16.0);
        assert!(rec.frame_pending.get());
    }
    assert_eq!(rec.frames_rendered.get(), 5);
    engine.teardown();
    engine.frame(100.0);
    assert_eq!(rec.frames_rendered.get(), 5);
    assert!(!rec.frame_pending.get());
}

#[test]
fn scroll_cell_reaches_the_camera() {
    let (rec, container) = setup();
    let scroll = ScrollCell::new();
    let mut engine = SceneEngine::mount(
        FakeBackend::new(&rec, &container),
        params(SceneStyle::Orb),
        scroll.clone(),
    );
    scroll.set(500.0);
    engine.frame(0.0);
    let y = engine
        .session()
        .map(|s| s.camera().position.y)
        .unwrap_or_default();
    assert!((y + 10.0).abs() < 1e-4);
}

#[test]
fn style_switches_never_overlap_sessions() {
    let (rec, container) = setup();
    let mut slot: SceneSlot<FakeBackend> = SceneSlot::new();
    let scroll = ScrollCell::new();
    let styles = [
        SceneStyle::Orb,
        SceneStyle::Grid,
        SceneStyle::Waves,
        SceneStyle::Particles,
        SceneStyle::Orb,
        SceneStyle::Cyber,
    ];
    for _ in 0..3 {
        for style in styles {
            let key = SceneKey {
                style,
                primary: "#8b5cf6".into(),
            };
            slot.ensure(key, |key| {
                // the previous session must already be gone
                assert_eq!(rec.geometries.get(), 0);
                let p = SceneParams {
                    style: key.style,
                    primary: key.primary.clone(),
                    seed: 1,
                };
                SceneEngine::mount_shared(p, scroll.clone(), |_weak| {
                    FakeBackend::new(&rec, &container)
                })
            });
            assert_eq!(rec.geometries.get(), 1);
            assert_eq!(rec.listeners.get(), 1);
            assert_eq!(rec.surfaces.get(), 1);
        }
    }
    assert_eq!(rec.max_live.get(), 1);
    slot.clear();
    assert!(rec.all_clear());
}

#[test]
fn unchanged_key_does_not_rebuild() {
    let (rec, container) = setup();
    let mut slot: SceneSlot<FakeBackend> = SceneSlot::new();
    let key = SceneKey {
        style: SceneStyle::Grid,
        primary: "#22c55e".into(),
    };
    let build = |key: &SceneKey| {
        SceneEngine::mount_shared(
            SceneParams {
                style: key.style,
                primary: key.primary.clone(),
                seed: 3,
            },
            ScrollCell::new(),
            |_| FakeBackend::new(&rec, &container),
        )
    };
    assert!(slot.ensure(key.clone(), build));
    assert!(!slot.ensure(key.clone(), build));
    let recoloured = SceneKey {
        primary: "#ef4444".into(),
        ..key
    };
    assert!(slot.ensure(recoloured, build));
    assert_eq!(rec.calls.borrow().iter().filter(|c| **c == "attach").count(), 2);
}

#[test]
fn resize_reaches_surface_and_camera_for_every_device_preset() {
    let (rec, container) = setup();
    let engine = SceneEngine::mount_shared(params(SceneStyle::Orb), ScrollCell::new(), |_| {
        FakeBackend::new(&rec, &container)
    });
    for (w, h) in [(1440, 900), (768, 1024), (375, 667)] {
        container.set(SurfaceSize::new(w, h, 2.0));
        engine.borrow().backend().fire_resize();
        engine.borrow_mut().frame(16.0);

        assert_eq!(rec.surface_size.get(), (w, h));
        let aspect = engine
            .borrow()
            .session()
            .map(|s| s.camera().aspect)
            .unwrap_or_default();
        assert!((aspect - w as f32 / h as f32).abs() < 1e-6, "{w}x{h}");
    }
}

#[test]
fn zero_sized_resize_is_ignored() {
    let (rec, container) = setup();
    let mut engine = SceneEngine::mount(
        FakeBackend::new(&rec, &container),
        params(SceneStyle::Grid),
        ScrollCell::new(),
    );
    engine.notify_resize(SurfaceSize::new(0, 0, 1.0));
    engine.frame(0.0);
    assert_eq!(rec.surface_size.get(), (1280, 720));
}
