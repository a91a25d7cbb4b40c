//! Procedural meshes for the backdrop, emitted as GPU-ready vertex data.

use std::collections::HashSet;

use fnv::FnvHashMap;
use glam::Vec3;
use smallvec::SmallVec;

/// One particle as uploaded to the instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    Lines,
    Triangles,
}

#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Unit-sphere icosahedron subdivided so every face becomes `(detail + 1)^2`
/// triangles, scaled to `radius`. Shared vertices are welded.
pub fn icosphere(radius: f32, detail: u32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let base = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    let n = detail + 1;
    let mut welder = Welder::new(radius);
    let mut triangles = Vec::with_capacity(FACES.len() * (n * n) as usize);
    for face in FACES {
        let (a, b, c) = (base[face[0]], base[face[1]], base[face[2]]);
        let point = |i: u32, j: u32| {
            let p = a + (b - a) * (i as f32 / n as f32) + (c - a) * (j as f32 / n as f32);
            p.normalize() * radius
        };
        for i in 0..n {
            for j in 0..(n - i) {
                let v0 = welder.index(point(i, j));
                let v1 = welder.index(point(i + 1, j));
                let v2 = welder.index(point(i, j + 1));
                triangles.push([v0, v1, v2]);
                if i + j + 1 < n {
                    let v3 = welder.index(point(i + 1, j + 1));
                    triangles.push([v1, v3, v2]);
                }
            }
        }
    }
    (welder.positions, triangles)
}

/// Every distinct triangle edge as a line segment.
pub fn wireframe(positions: &[Vec3], triangles: &[[u32; 3]], color: [f32; 3]) -> MeshData {
    let mut seen = HashSet::new();
    let mut indices = Vec::new();
    for tri in triangles {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                indices.extend_from_slice(&[key.0, key.1]);
            }
        }
    }
    MeshData {
        vertices: colored(positions, color),
        indices,
        topology: Topology::Lines,
    }
}

pub fn solid(positions: &[Vec3], triangles: &[[u32; 3]], color: [f32; 3]) -> MeshData {
    MeshData {
        vertices: colored(positions, color),
        indices: triangles.iter().flatten().copied().collect(),
        topology: Topology::Triangles,
    }
}

/// Square lattice on the XZ plane. The two centre lines use `center_color`.
pub fn lattice(size: f32, divisions: u32, center_color: [f32; 3], line_color: [f32; 3]) -> MeshData {
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut vertices = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i == divisions / 2 {
            center_color
        } else {
            line_color
        };
        vertices.push(MeshVertex {
            position: [-half, 0.0, k],
            color,
        });
        vertices.push(MeshVertex {
            position: [half, 0.0, k],
            color,
        });
        vertices.push(MeshVertex {
            position: [k, 0.0, -half],
            color,
        });
        vertices.push(MeshVertex {
            position: [k, 0.0, half],
            color,
        });
    }
    let indices = (0..vertices.len() as u32).collect();
    MeshData {
        vertices,
        indices,
        topology: Topology::Lines,
    }
}

/// Latitude/longitude sphere used for the pointer marker.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32, color: [f32; 3]) -> MeshData {
    let mut positions = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for r in 0..=rings {
        let theta = r as f32 / rings as f32 * std::f32::consts::PI;
        for s in 0..=segments {
            let phi = s as f32 / segments as f32 * std::f32::consts::TAU;
            positions.push(Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }
    let stride = segments + 1;
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            if r != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if r != rings - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }
    MeshData {
        vertices: colored(&positions, color),
        indices,
        topology: Topology::Triangles,
    }
}

fn colored(positions: &[Vec3], color: [f32; 3]) -> Vec<MeshVertex> {
    positions
        .iter()
        .map(|p| MeshVertex {
            position: p.to_array(),
            color,
        })
        .collect()
}

/// Merges points closer than a small tolerance, bucketed on a grid one
/// tolerance wide so a lookup only visits the 27 neighbouring cells.
struct Welder {
    positions: Vec<Vec3>,
    cells: FnvHashMap<[i64; 3], SmallVec<[u32; 2]>>,
    tolerance: f32,
}

impl Welder {
    fn new(radius: f32) -> Self {
        Self {
            positions: Vec::new(),
            cells: FnvHashMap::default(),
            tolerance: radius.abs().max(1e-3) * 1e-4,
        }
    }

    fn cell(&self, p: Vec3) -> [i64; 3] {
        let q = (p / self.tolerance).floor();
        [q.x as i64, q.y as i64, q.z as i64]
    }

    fn index(&mut self, p: Vec3) -> u32 {
        let [x, y, z] = self.cell(p);
        let tolerance_sq = self.tolerance * self.tolerance;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&[x + dx, y + dy, z + dz]) else {
                        continue;
                    };
                    if let Some(&i) = bucket
                        .iter()
                        .find(|&&i| self.positions[i as usize].distance_squared(p) <= tolerance_sq)
                    {
                        return i;
                    }
                }
            }
        }
        let i = self.positions.len() as u32;
        self.positions.push(p);
        self.cells.entry([x, y, z]).or_default().push(i);
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosphere_counts_follow_subdivision() {
        // V = 10 n^2 + 2, F = 20 n^2 for n = detail + 1
        for (detail, n) in [(0u32, 1usize), (1, 2), (2, 3)] {
            let (pos, tris) = icosphere(6.0, detail);
            assert_eq!(tris.len(), 20 * n * n, "detail {detail}");
            assert_eq!(pos.len(), 10 * n * n + 2, "detail {detail}");
            assert!(pos.iter().all(|p| (p.length() - 6.0).abs() < 1e-3));
        }
    }

    #[test]
    fn welder_merges_across_cell_boundaries() {
        let mut w = Welder::new(1.0);
        let tol = w.tolerance;
        // straddles a grid line on x
        let a = w.index(Vec3::new(tol * 10.0 - tol * 0.2, 0.5, 0.5));
        let b = w.index(Vec3::new(tol * 10.0 + tol * 0.2, 0.5, 0.5));
        assert_eq!(a, b);
        let c = w.index(Vec3::new(0.5, 0.5, 0.5 + tol * 3.0));
        assert_ne!(a, c);
        assert_eq!(w.positions.len(), 2);
    }

    #[test]
    fn wireframe_has_each_edge_once() {
        let (pos, tris) = icosphere(1.0, 2);
        let wire = wireframe(&pos, &tris, [1.0; 3]);
        // Euler: E = V + F - 2
        let edges = pos.len() + tris.len() - 2;
        assert_eq!(wire.indices.len(), edges * 2);
        assert_eq!(wire.topology, Topology::Lines);
    }

    #[test]
    fn lattice_centre_lines_take_centre_colour() {
        let grid = lattice(200.0, 60, [1.0, 0.0, 0.0], [0.2, 0.2, 0.2]);
        assert_eq!(grid.vertices.len(), 61 * 4);
        let centre: Vec<_> = grid
            .vertices
            .iter()
            .filter(|v| v.color == [1.0, 0.0, 0.0])
            .collect();
        assert_eq!(centre.len(), 4);
        assert!(grid
            .vertices
            .iter()
            .all(|v| v.position[0].abs() <= 100.0 && v.position[2].abs() <= 100.0));
    }

    #[test]
    fn uv_sphere_indices_are_in_range() {
        let s = uv_sphere(0.3, 16, 16, [1.0; 3]);
        assert_eq!(s.index_count() % 3, 0);
        assert!(s.indices.iter().all(|&i| (i as usize) < s.vertices.len()));
    }
}
