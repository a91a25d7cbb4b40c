use glam::Vec3;
use rand::Rng;

use crate::constants::{
    PARTICLE_CEILING, PARTICLE_FLOOR, PARTICLE_SPEED_MIN, PARTICLE_SPEED_SPAN, PARTICLE_SPREAD,
    WAVE_AMPLITUDE, WAVE_FREQUENCY,
};
use crate::scene::geometry::PointInstance;

/// Point cloud with per-point size and upward speed.
///
/// Points are never created or destroyed after construction; motion is cyclic.
#[derive(Clone, Debug)]
pub struct ParticleCloud {
    positions: Vec<Vec3>,
    sizes: Vec<f32>,
    speeds: Vec<f32>,
}

impl ParticleCloud {
    /// Scatter `count` points uniformly in a cube of side [`PARTICLE_SPREAD`].
    pub fn scatter<R: Rng>(count: usize, size_max: f32, rng: &mut R) -> Self {
        let half = PARTICLE_SPREAD * 0.5;
        let positions = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                )
            })
            .collect();
        let sizes = (0..count).map(|_| rng.gen::<f32>() * size_max).collect();
        let speeds = (0..count)
            .map(|_| PARTICLE_SPEED_MIN + rng.gen::<f32>() * PARTICLE_SPEED_SPAN)
            .collect();
        Self {
            positions,
            sizes,
            speeds,
        }
    }

    pub fn from_parts(positions: Vec<Vec3>, sizes: Vec<f32>, speeds: Vec<f32>) -> Self {
        debug_assert!(positions.len() == sizes.len() && sizes.len() == speeds.len());
        Self {
            positions,
            sizes,
            speeds,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    /// Advance every point upward by its speed, wrapping past the ceiling.
    pub fn rise(&mut self) {
        for (p, speed) in self.positions.iter_mut().zip(&self.speeds) {
            p.y = wrap_height(p.y + speed);
        }
    }

    /// Overwrite heights from the travelling sinusoid at time `t`.
    pub fn apply_waves(&mut self, t: f32) {
        for p in &mut self.positions {
            p.y = wave_height(p.x, p.z, t);
        }
    }

    pub fn write_instances(&self, out: &mut Vec<PointInstance>) {
        out.clear();
        out.extend(
            self.positions
                .iter()
                .zip(&self.sizes)
                .map(|(p, size)| PointInstance {
                    position: p.to_array(),
                    size: *size,
                }),
        );
    }
}

#[inline]
pub fn wrap_height(y: f32) -> f32 {
    if y > PARTICLE_CEILING {
        PARTICLE_FLOOR
    } else {
        y
    }
}

#[inline]
pub fn wave_height(x: f32, z: f32, t: f32) -> f32 {
    (t + x * WAVE_FREQUENCY + z * WAVE_FREQUENCY).sin() * WAVE_AMPLITUDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scatter_respects_bounds_and_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let cloud = ParticleCloud::scatter(500, 2.5, &mut rng);
        assert_eq!(cloud.len(), 500);
        let half = PARTICLE_SPREAD * 0.5;
        assert!(cloud
            .positions()
            .iter()
            .all(|p| p.abs().max_element() <= half));
        assert!(cloud
            .speeds()
            .iter()
            .all(|s| (PARTICLE_SPEED_MIN..=PARTICLE_SPEED_MIN + PARTICLE_SPEED_SPAN).contains(s)));
    }

    #[test]
    fn point_above_ceiling_wraps_to_floor_and_stays() {
        let mut cloud = ParticleCloud::from_parts(
            vec![Vec3::new(1.0, PARTICLE_CEILING + 3.0, 2.0), Vec3::new(0.0, 10.0, 0.0)],
            vec![1.0, 1.0],
            vec![0.05, 0.05],
        );
        cloud.rise();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions()[0].y, PARTICLE_FLOOR);
        assert_eq!(cloud.positions()[0].x, 1.0);
        assert!((cloud.positions()[1].y - 10.05).abs() < 1e-5);
    }

    #[test]
    fn point_just_below_ceiling_crosses_on_next_rise() {
        let mut cloud = ParticleCloud::from_parts(
            vec![Vec3::new(0.0, PARTICLE_CEILING - 0.01, 0.0)],
            vec![1.0],
            vec![0.05],
        );
        cloud.rise();
        assert_eq!(cloud.positions()[0].y, PARTICLE_FLOOR);
    }

    #[test]
    fn waves_overwrite_heights() {
        let mut cloud = ParticleCloud::from_parts(
            vec![Vec3::new(0.0, 42.0, 0.0), Vec3::new(10.0, -7.0, 5.0)],
            vec![1.0, 1.0],
            vec![0.02, 0.02],
        );
        cloud.apply_waves(0.0);
        assert!(cloud.positions()[0].y.abs() < 1e-6);
        assert!((cloud.positions()[1].y - 1.5f32.sin() * WAVE_AMPLITUDE).abs() < 1e-4);
        assert!(cloud.positions().iter().all(|p| p.y.abs() <= WAVE_AMPLITUDE));
    }

    #[test]
    fn instances_mirror_positions_and_sizes() {
        let mut rng = StdRng::seed_from_u64(3);
        let cloud = ParticleCloud::scatter(8, 2.0, &mut rng);
        let mut out = vec![PointInstance::default(); 3];
        cloud.write_instances(&mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(out[4].position, cloud.positions()[4].to_array());
    }
}
