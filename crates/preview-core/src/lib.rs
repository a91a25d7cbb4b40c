pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub mod color;
pub mod config;
pub mod constants;
pub mod content;
pub mod deploy;
pub mod edit;
pub mod error;
pub mod icons;
pub mod imagegen;
pub mod media;
pub mod scene;
pub mod scroll;
pub mod shell;

pub use config::PreviewConfig;
pub use content::{ContentField, PaletteRole, WebsiteDescription};
pub use error::{PreviewError, PreviewResult};
pub use scene::{SceneBackend, SceneEngine, SceneKey, SceneSlot, SceneStyle};
pub use scroll::{ScrollCell, ScrollSmoother};
pub use shell::{DeviceFrame, ShellState};
