//! Cape cloth: a vertex grid hanging from the shoulders, rippled by wind each frame.
//!
//! The rest shape is a flat `CAPE_WIDTH × CAPE_LENGTH` plane whose top edge sits at
//! `y = 0` (the shoulder line) and which hangs down to `y = -CAPE_LENGTH`. The wave
//! terms scale with how far a vertex is from the top, so the shoulder row never moves.

use bytemuck::{Pod, Zeroable};
use engine_core::{Vec2, Vec3};

pub const CAPE_WIDTH: f32 = 0.9;
pub const CAPE_LENGTH: f32 = 1.4;
/// Quads across.
pub const CAPE_COLUMNS: usize = 16;
/// Quads down.
pub const CAPE_ROWS: usize = 20;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CapeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Wind parameters for the current gait.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Wind {
    speed: f32,
    amplitude: f32,
    flutter_freq: f32,
}

impl Wind {
    fn for_gait(moving: bool, sprinting: bool) -> Self {
        match (moving, sprinting) {
            (true, true) => Wind {
                speed: 20.0,
                amplitude: 0.2,
                flutter_freq: 25.0,
            },
            (true, false) => Wind {
                speed: 12.0,
                amplitude: 0.1,
                flutter_freq: 8.0,
            },
            _ => Wind {
                speed: 2.0,
                amplitude: 0.02,
                flutter_freq: 8.0,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapeCloth {
    rest: Vec<Vec2>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Default for CapeCloth {
    fn default() -> Self {
        Self::new()
    }
}

impl CapeCloth {
    pub fn new() -> Self {
        let cols = CAPE_COLUMNS + 1;
        let rows = CAPE_ROWS + 1;
        let mut rest = Vec::with_capacity(cols * rows);
        for iy in 0..rows {
            let y = -(iy as f32) * CAPE_LENGTH / CAPE_ROWS as f32;
            for ix in 0..cols {
                let x = ix as f32 * CAPE_WIDTH / CAPE_COLUMNS as f32 - CAPE_WIDTH * 0.5;
                rest.push(Vec2::new(x, y));
            }
        }

        let mut indices = Vec::with_capacity(CAPE_COLUMNS * CAPE_ROWS * 6);
        for iy in 0..CAPE_ROWS {
            for ix in 0..CAPE_COLUMNS {
                let a = (iy * cols + ix) as u32;
                let b = ((iy + 1) * cols + ix) as u32;
                let c = b + 1;
                let d = a + 1;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let positions = rest.iter().map(|p| p.extend(0.0)).collect();
        let mut cloth = Self {
            normals: vec![Vec3::Z; rest.len()],
            rest,
            positions,
            indices,
        };
        cloth.recompute_normals();
        cloth
    }

    /// Displace every vertex for time `t` and the current gait.
    pub fn update(&mut self, t: f32, moving: bool, sprinting: bool) {
        let wind = Wind::for_gait(moving, sprinting);
        for (rest, out) in self.rest.iter().zip(self.positions.iter_mut()) {
            let (px, py) = (rest.x, rest.y);
            let fluidity = (py / CAPE_LENGTH).abs().min(1.0);
            let loose = fluidity * fluidity;

            let pleat = (px * 12.0).cos() * 0.06 * loose;
            let wave = (py * 4.0 - t * wind.speed).sin() * wind.amplitude * loose;
            let flutter = (t * wind.flutter_freq + px * 15.0).sin() * 0.03 * loose;
            let shoulder = px * px * -0.6 * fluidity;

            *out = Vec3::new(
                px + (py * 8.0).sin() * 0.01 * loose,
                py,
                pleat + wave + flutter + shoulder,
            );
        }
        self.recompute_normals();
    }

    /// Area-weighted vertex normals from the triangle list.
    fn recompute_normals(&mut self) {
        for n in &mut self.normals {
            *n = Vec3::ZERO;
        }
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Interleaved vertex buffer contents.
    pub fn vertices(&self) -> Vec<CapeVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| CapeVertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions() {
        let cloth = CapeCloth::new();
        assert_eq!(cloth.positions().len(), 17 * 21);
        assert_eq!(cloth.indices().len(), 16 * 20 * 6);
        assert!(cloth.normals().iter().all(|n| (*n - Vec3::Z).length() < 1e-5));
    }

    #[test]
    fn top_row_stays_pinned() {
        let mut cloth = CapeCloth::new();
        let top: Vec<Vec3> = cloth.positions()[..=CAPE_COLUMNS].to_vec();
        for frame in 0..200 {
            let t = frame as f32 * 0.016;
            cloth.update(t, frame % 2 == 0, frame % 3 == 0);
            assert_eq!(&cloth.positions()[..=CAPE_COLUMNS], top.as_slice());
        }
    }

    #[test]
    fn sprinting_billows_more_than_idle() {
        let spread = |moving, sprinting| {
            let mut cloth = CapeCloth::new();
            let mut max_z: f32 = 0.0;
            for frame in 0..120 {
                cloth.update(frame as f32 * 0.016, moving, sprinting);
                let bottom_center = cloth.positions()[CAPE_ROWS * (CAPE_COLUMNS + 1) + CAPE_COLUMNS / 2];
                max_z = max_z.max(bottom_center.z.abs());
            }
            max_z
        };
        assert!(spread(true, true) > spread(false, false));
    }

    #[test]
    fn normals_stay_unit_after_deformation() {
        let mut cloth = CapeCloth::new();
        cloth.update(1.3, true, true);
        for n in cloth.normals() {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
        assert_eq!(cloth.vertices().len(), cloth.positions().len());
    }
}
