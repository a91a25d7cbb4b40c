pub mod camera;
pub mod engine;
pub mod geometry;
pub mod particles;
pub mod pointer;
pub mod session;
pub mod style;

pub use camera::Camera;
pub use engine::{EnginePhase, ResizeInbox, SceneBackend, SceneEngine, SceneKey, SceneSlot};
pub use geometry::{MeshData, MeshVertex, PointInstance, Topology};
pub use particles::ParticleCloud;
pub use pointer::{client_to_ndc, PointerCell, PointerDamper};
pub use session::{
    Blend, FrameView, MeshPart, MeshRole, SceneGeometry, SceneParams, SceneSession, SurfaceSize,
};
pub use style::SceneStyle;
