use serde::{Deserialize, Serialize};

use crate::constants::{
    PARTICLE_COUNT_DENSE, PARTICLE_COUNT_SPARSE, PARTICLE_SIZE_DENSE, PARTICLE_SIZE_SPARSE,
};

/// Backdrop variant selected by `hero.style3D`.
///
/// `Cyber` is not offered by the picker but is accepted from generated data
/// and shares the lattice path with `Grid`. Unknown names fall back to `Orb`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SceneStyle {
    #[default]
    Orb,
    Particles,
    Grid,
    Waves,
    Cyber,
}

impl SceneStyle {
    /// Styles offered in the hero picker, in display order.
    pub const PICKER: [SceneStyle; 4] = [
        SceneStyle::Orb,
        SceneStyle::Particles,
        SceneStyle::Grid,
        SceneStyle::Waves,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SceneStyle::Orb => "orb",
            SceneStyle::Particles => "particles",
            SceneStyle::Grid => "grid",
            SceneStyle::Waves => "waves",
            SceneStyle::Cyber => "cyber",
        }
    }

    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "particles" => SceneStyle::Particles,
            "grid" => SceneStyle::Grid,
            "waves" => SceneStyle::Waves,
            "cyber" => SceneStyle::Cyber,
            _ => SceneStyle::Orb,
        }
    }

    pub fn particle_count(self) -> usize {
        match self {
            SceneStyle::Particles => PARTICLE_COUNT_DENSE,
            _ => PARTICLE_COUNT_SPARSE,
        }
    }

    pub fn particle_size_max(self) -> f32 {
        match self {
            SceneStyle::Particles => PARTICLE_SIZE_DENSE,
            _ => PARTICLE_SIZE_SPARSE,
        }
    }

    pub fn has_lattice(self) -> bool {
        matches!(self, SceneStyle::Grid | SceneStyle::Cyber)
    }

    pub fn has_orb(self) -> bool {
        matches!(self, SceneStyle::Orb)
    }

    /// Points drift upward and wrap.
    pub fn rises(self) -> bool {
        matches!(self, SceneStyle::Particles | SceneStyle::Orb)
    }

    /// Point heights follow the sinusoidal height-field.
    pub fn is_height_field(self) -> bool {
        matches!(self, SceneStyle::Waves)
    }
}

impl From<String> for SceneStyle {
    fn from(name: String) -> Self {
        SceneStyle::parse(&name)
    }
}

impl From<SceneStyle> for String {
    fn from(style: SceneStyle) -> Self {
        style.as_str().to_string()
    }
}

impl std::fmt::Display for SceneStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_lenient_with_orb_fallback() {
        assert_eq!(SceneStyle::parse("Waves"), SceneStyle::Waves);
        assert_eq!(SceneStyle::parse(" grid "), SceneStyle::Grid);
        assert_eq!(SceneStyle::parse("cyber"), SceneStyle::Cyber);
        assert_eq!(SceneStyle::parse("tornado"), SceneStyle::Orb);
    }

    #[test]
    fn variant_traits_match_the_motion_table() {
        assert_eq!(SceneStyle::Particles.particle_count(), 4000);
        for s in [SceneStyle::Orb, SceneStyle::Grid, SceneStyle::Waves, SceneStyle::Cyber] {
            assert_eq!(s.particle_count(), 2000);
        }
        assert!(SceneStyle::Cyber.has_lattice() && SceneStyle::Grid.has_lattice());
        assert!(!SceneStyle::Waves.rises() && SceneStyle::Waves.is_height_field());
        assert!(SceneStyle::Orb.rises() && SceneStyle::Orb.has_orb());
        assert!(!SceneStyle::Grid.rises());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let s: SceneStyle = serde_json::from_str("\"particles\"").unwrap();
        assert_eq!(s, SceneStyle::Particles);
        assert_eq!(serde_json::to_string(&SceneStyle::Waves).unwrap(), "\"waves\"");
        let unknown: SceneStyle = serde_json::from_str("\"hologram\"").unwrap();
        assert_eq!(unknown, SceneStyle::Orb);
    }
}
