//! One live backdrop: the geometry built for a style plus its per-frame motion.

use glam::{Mat4, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

use crate::color::{scene_tint, Rgb};
use crate::constants::*;
use crate::scene::camera::Camera;
use crate::scene::geometry::{self, MeshData, PointInstance};
use crate::scene::particles::ParticleCloud;
use crate::scene::pointer::PointerDamper;
use crate::scene::style::SceneStyle;

/// Construction parameters; the only inputs the scene takes from the page.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneParams {
    pub style: SceneStyle,
    pub primary: String,
    pub seed: u64,
}

/// Content box of the container in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Backing-store size with the pixel ratio capped at [`MAX_PIXEL_RATIO`].
    pub fn backing(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO);
        (
            ((self.width as f64 * ratio) as u32).max(1),
            ((self.height as f64 * ratio) as u32).max(1),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshRole {
    OrbWire,
    OrbGlow,
    Lattice,
    Marker,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Additive,
    Alpha,
}

#[derive(Clone, Debug)]
pub struct MeshPart {
    pub role: MeshRole,
    pub mesh: MeshData,
    pub opacity: f32,
    pub blend: Blend,
}

/// Static geometry handed to the backend once per session.
#[derive(Clone, Debug)]
pub struct SceneGeometry {
    pub tint: [f32; 3],
    pub particle_capacity: usize,
    pub meshes: SmallVec<[MeshPart; 4]>,
}

/// Everything the backend needs to draw one frame.
#[derive(Debug)]
pub struct FrameView<'a> {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub particle_model: Mat4,
    /// Present only when point positions changed since the last frame.
    pub particles: Option<&'a [PointInstance]>,
    pub particle_count: u32,
    pub transforms: SmallVec<[(MeshRole, Mat4); 4]>,
    pub tint: [f32; 3],
}

pub struct SceneSession {
    style: SceneStyle,
    tint: Rgb,
    cloud: ParticleCloud,
    instances: Vec<PointInstance>,
    instances_dirty: bool,
    pointer: PointerDamper,
    camera: Camera,
    elapsed: f32,
    group_tilt: Vec2,
    cloud_spin: f32,
    orb_rotation: Vec2,
    orb_scale: f32,
    marker: Vec3,
}

impl SceneSession {
    pub fn new(params: &SceneParams, size: SurfaceSize) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let style = params.style;
        let cloud = ParticleCloud::scatter(style.particle_count(), style.particle_size_max(), &mut rng);
        let mut instances = Vec::with_capacity(cloud.len());
        cloud.write_instances(&mut instances);
        let mut camera = Camera::default();
        camera.set_viewport(size.width, size.height);
        Self {
            style,
            tint: scene_tint(&params.primary),
            cloud,
            instances,
            instances_dirty: true,
            pointer: PointerDamper::default(),
            camera,
            elapsed: 0.0,
            group_tilt: Vec2::ZERO,
            cloud_spin: 0.0,
            orb_rotation: Vec2::ZERO,
            orb_scale: 1.0,
            marker: Vec3::new(0.0, 0.0, MARKER_Z),
        }
    }

    pub fn style(&self) -> SceneStyle {
        self.style
    }

    pub fn tint(&self) -> Rgb {
        self.tint
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    pub fn marker(&self) -> Vec3 {
        self.marker
    }

    pub fn orb_scale(&self) -> f32 {
        self.orb_scale
    }

    pub fn group_tilt(&self) -> Vec2 {
        self.group_tilt
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Build the static meshes for this style.
    pub fn geometry(&self) -> SceneGeometry {
        let tint = self.tint.to_array();
        let mut meshes = SmallVec::new();
        if self.style.has_lattice() {
            meshes.push(MeshPart {
                role: MeshRole::Lattice,
                mesh: geometry::lattice(GRID_SIZE, GRID_DIVISIONS, tint, GRID_LINE_COLOR),
                opacity: 1.0,
                blend: Blend::Alpha,
            });
        }
        if self.style.has_orb() {
            let (pos, tris) = geometry::icosphere(ORB_WIRE_RADIUS, ORB_WIRE_DETAIL);
            meshes.push(MeshPart {
                role: MeshRole::OrbWire,
                mesh: geometry::wireframe(&pos, &tris, tint),
                opacity: ORB_WIRE_OPACITY,
                blend: Blend::Additive,
            });
            let (pos, tris) = geometry::icosphere(ORB_GLOW_RADIUS, ORB_GLOW_DETAIL);
            meshes.push(MeshPart {
                role: MeshRole::OrbGlow,
                mesh: geometry::solid(&pos, &tris, tint),
                opacity: ORB_GLOW_OPACITY,
                blend: Blend::Additive,
            });
        }
        meshes.push(MeshPart {
            role: MeshRole::Marker,
            mesh: geometry::uv_sphere(MARKER_RADIUS, MARKER_SEGMENTS, MARKER_SEGMENTS, tint),
            opacity: MARKER_OPACITY,
            blend: Blend::Alpha,
        });
        SceneGeometry {
            tint,
            particle_capacity: self.cloud.len(),
            meshes,
        }
    }

    /// One animation step: pointer damping, marker, tilt, per-style motion,
    /// then the scroll-driven camera.
    pub fn advance(&mut self, time_sec: f32, pointer_target: Vec2, scroll_px: f32) {
        self.elapsed = time_sec;
        let p = self.pointer.step(pointer_target);
        self.marker = Vec3::new(p.x * MARKER_RANGE_X, p.y * MARKER_RANGE_Y, MARKER_Z);
        self.group_tilt = Vec2::new(-p.y * TILT_PER_POINTER, p.x * TILT_PER_POINTER);

        if self.style.rises() {
            self.cloud.rise();
            self.instances_dirty = true;
            self.cloud_spin = time_sec * PARTICLE_SPIN_PER_SEC;
        }
        if self.style.has_orb() {
            self.orb_rotation = Vec2::new(time_sec * ORB_SPIN_X_PER_SEC, time_sec * ORB_SPIN_Y_PER_SEC);
            self.orb_scale = 1.0 + (time_sec * ORB_PULSE_RATE).sin() * ORB_PULSE_DEPTH;
        }
        if self.style.is_height_field() {
            self.cloud.apply_waves(time_sec);
            self.instances_dirty = true;
        }

        self.camera.follow_scroll(scroll_px);
    }

    /// Snapshot for rendering. Clears the particle dirty flag.
    pub fn frame_view(&mut self) -> FrameView<'_> {
        let group = Mat4::from_quat(Quat::from_euler(
            glam::EulerRot::XYZ,
            self.group_tilt.x,
            self.group_tilt.y,
            0.0,
        ));
        let particle_model = group * Mat4::from_rotation_y(self.cloud_spin);

        let mut transforms = SmallVec::new();
        if self.style.has_lattice() {
            transforms.push((
                MeshRole::Lattice,
                group * Mat4::from_translation(Vec3::new(0.0, GRID_Y, 0.0)),
            ));
        }
        if self.style.has_orb() {
            let spin = Quat::from_euler(
                glam::EulerRot::XYZ,
                self.orb_rotation.x,
                self.orb_rotation.y,
                0.0,
            );
            transforms.push((
                MeshRole::OrbWire,
                group * Mat4::from_scale_rotation_translation(Vec3::splat(self.orb_scale), spin, Vec3::ZERO),
            ));
            transforms.push((MeshRole::OrbGlow, group));
        }
        transforms.push((MeshRole::Marker, Mat4::from_translation(self.marker)));

        let particles = if self.instances_dirty {
            self.cloud.write_instances(&mut self.instances);
            self.instances_dirty = false;
            Some(self.instances.as_slice())
        } else {
            None
        };

        FrameView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            camera_position: self.camera.position,
            particle_model,
            particles,
            particle_count: self.instances.len() as u32,
            transforms,
            tint: self.tint.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(style: SceneStyle) -> SceneParams {
        SceneParams {
            style,
            primary: "#22c55e".into(),
            seed: 9,
        }
    }

    fn size() -> SurfaceSize {
        SurfaceSize::new(1280, 720, 2.0)
    }

    #[test]
    fn backing_size_caps_pixel_ratio() {
        assert_eq!(size().backing(), (1920, 1080));
        assert_eq!(SurfaceSize::new(375, 667, 1.0).backing(), (375, 667));
        assert_eq!(SurfaceSize::new(0, 0, 1.0).backing(), (1, 1));
    }

    #[test]
    fn geometry_per_style() {
        let roles = |style| {
            SceneSession::new(&params(style), size())
                .geometry()
                .meshes
                .iter()
                .map(|m| m.role)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            roles(SceneStyle::Orb),
            vec![MeshRole::OrbWire, MeshRole::OrbGlow, MeshRole::Marker]
        );
        assert_eq!(roles(SceneStyle::Grid), vec![MeshRole::Lattice, MeshRole::Marker]);
        assert_eq!(roles(SceneStyle::Cyber), vec![MeshRole::Lattice, MeshRole::Marker]);
        assert_eq!(roles(SceneStyle::Particles), vec![MeshRole::Marker]);
        assert_eq!(roles(SceneStyle::Waves), vec![MeshRole::Marker]);
    }

    #[test]
    fn particle_capacity_follows_style() {
        let dense = SceneSession::new(&params(SceneStyle::Particles), size());
        assert_eq!(dense.geometry().particle_capacity, 4000);
        let sparse = SceneSession::new(&params(SceneStyle::Waves), size());
        assert_eq!(sparse.geometry().particle_capacity, 2000);
    }

    #[test]
    fn same_seed_same_cloud() {
        let a = SceneSession::new(&params(SceneStyle::Orb), size());
        let b = SceneSession::new(&params(SceneStyle::Orb), size());
        assert_eq!(a.cloud().positions(), b.cloud().positions());
    }

    #[test]
    fn grid_cloud_is_static_and_uploaded_once() {
        let mut s = SceneSession::new(&params(SceneStyle::Grid), size());
        assert!(s.frame_view().particles.is_some());
        let before = s.cloud().positions().to_vec();
        s.advance(1.0, Vec2::ZERO, 0.0);
        assert!(s.frame_view().particles.is_none());
        assert_eq!(s.cloud().positions(), before.as_slice());
    }

    #[test]
    fn waves_reupload_every_frame() {
        let mut s = SceneSession::new(&params(SceneStyle::Waves), size());
        let _ = s.frame_view();
        s.advance(0.5, Vec2::ZERO, 0.0);
        let view = s.frame_view();
        assert_eq!(view.particles.map(|p| p.len()), Some(2000));
        assert!(s
            .cloud()
            .positions()
            .iter()
            .all(|p| p.y.abs() <= WAVE_AMPLITUDE + 1e-4));
    }

    #[test]
    fn orb_pulses_within_depth() {
        let mut s = SceneSession::new(&params(SceneStyle::Orb), size());
        for i in 0..100 {
            s.advance(i as f32 * 0.05, Vec2::ZERO, 0.0);
            assert!((s.orb_scale() - 1.0).abs() <= ORB_PULSE_DEPTH + 1e-6);
        }
    }

    #[test]
    fn pointer_moves_marker_and_tilts_group() {
        let mut s = SceneSession::new(&params(SceneStyle::Particles), size());
        for _ in 0..300 {
            s.advance(0.0, Vec2::new(1.0, 1.0), 0.0);
        }
        let m = s.marker();
        assert!((m.x - MARKER_RANGE_X).abs() < 0.01);
        assert!((m.y - MARKER_RANGE_Y).abs() < 0.01);
        assert_eq!(m.z, MARKER_Z);
        let tilt = s.group_tilt();
        assert!((tilt.y - TILT_PER_POINTER).abs() < 1e-3);
        assert!((tilt.x + TILT_PER_POINTER).abs() < 1e-3);
    }

    #[test]
    fn scroll_drives_camera() {
        let mut s = SceneSession::new(&params(SceneStyle::Orb), size());
        s.advance(0.0, Vec2::ZERO, 1000.0);
        assert!((s.camera().position.y + 20.0).abs() < 1e-4);
        assert!((s.camera().roll - 0.1).abs() < 1e-6);
    }

    #[test]
    fn dark_primary_is_lifted() {
        let p = SceneParams {
            style: SceneStyle::Orb,
            primary: "#050505".into(),
            seed: 1,
        };
        let s = SceneSession::new(&p, size());
        assert!(s.tint().to_hsl().l >= MIN_SCENE_LIGHTNESS - 1e-4);
    }
}
