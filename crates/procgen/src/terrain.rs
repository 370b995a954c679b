//! Analytic terrain height field.
//!
//! The ground is a sum of three sine waves over world X/Z. The same coefficients feed
//! the CPU query used for ground clamping and prop placement, and the shader source
//! the ground and grass vertex stages displace vertices with. Keep [`HEIGHT_TERMS`]
//! as the only place the numbers live.

use glam::Vec3;

/// One `sin(x·freq_x + z·freq_z)·amplitude` term of the height field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightTerm {
    pub freq_x: f32,
    pub freq_z: f32,
    pub amplitude: f32,
}

/// Terms summed in order by [`height`] and by the generated shader functions.
pub const HEIGHT_TERMS: [HeightTerm; 3] = [
    HeightTerm {
        freq_x: 0.015,
        freq_z: 0.008,
        amplitude: 2.5,
    },
    HeightTerm {
        freq_x: 0.005,
        freq_z: -0.012,
        amplitude: 3.0,
    },
    HeightTerm {
        freq_x: 0.03,
        freq_z: 0.03,
        amplitude: 0.4,
    },
];

/// Step used for finite-difference normals (matches the ground shader).
pub const NORMAL_EPSILON: f32 = 0.1;

/// Terrain elevation at world `(x, z)`.
#[inline]
pub fn height(x: f32, z: f32) -> f32 {
    let mut h = 0.0;
    for term in &HEIGHT_TERMS {
        h += (x * term.freq_x + z * term.freq_z).sin() * term.amplitude;
    }
    h
}

/// Upper bound on `|height(x, z)|` anywhere.
pub fn max_abs_height() -> f32 {
    HEIGHT_TERMS.iter().map(|t| t.amplitude.abs()).sum()
}

/// Surface normal by forward differences, the way the ground shader shades it.
pub fn terrain_normal(x: f32, z: f32, eps: f32) -> Vec3 {
    let h = height(x, z);
    let h_right = height(x + eps, z);
    let h_down = height(x, z + eps);
    Vec3::new(h - h_right, eps, h - h_down).normalize_or_zero()
}

/// Shortest literal that parses back to exactly `v`, parenthesised when negative so
/// it can follow a binary operator in either shading language.
fn shader_literal(v: f32) -> String {
    let s = format!("{:?}", v);
    if v.is_sign_negative() {
        format!("({})", s)
    } else {
        s
    }
}

fn write_terms(out: &mut String) {
    for term in &HEIGHT_TERMS {
        out.push_str(&format!(
            "    h += sin(p.x * {} + p.y * {}) * {};\n",
            shader_literal(term.freq_x),
            shader_literal(term.freq_z),
            shader_literal(term.amplitude),
        ));
    }
}

/// WGSL `terrain_height(p: vec2<f32>) -> f32`, where `p = (x, z)`.
pub fn height_wgsl() -> String {
    let mut out = String::from("fn terrain_height(p: vec2<f32>) -> f32 {\n    var h: f32 = 0.0;\n");
    write_terms(&mut out);
    out.push_str("    return h;\n}\n");
    out
}

/// GLSL `float getTerrainHeight(vec2 p)`, where `p = (x, z)`.
pub fn height_glsl() -> String {
    let mut out = String::from("float getTerrainHeight(vec2 p) {\n    float h = 0.0;\n");
    write_terms(&mut out);
    out.push_str("    return h;\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_form(x: f64, z: f64) -> f64 {
        (x * 0.015 + z * 0.008).sin() * 2.5
            + (x * 0.005 - z * 0.012).sin() * 3.0
            + (x * 0.03 + z * 0.03).sin() * 0.4
    }

    #[test]
    fn height_matches_closed_form_spot_checks() {
        for &(x, z) in &[(0.0f32, 0.0f32), (100.0, 50.0), (-200.0, 300.0)] {
            let got = height(x, z) as f64;
            let want = closed_form(x as f64, z as f64);
            assert!((got - want).abs() < 1e-4, "height({}, {}) = {} want {}", x, z, got, want);
        }
        assert_eq!(height(0.0, 0.0), 0.0);
    }

    #[test]
    fn height_is_deterministic() {
        for i in 0..200 {
            let x = i as f32 * 13.7 - 900.0;
            let z = i as f32 * -7.3 + 400.0;
            assert_eq!(height(x, z).to_bits(), height(x, z).to_bits());
        }
    }

    #[test]
    fn height_is_bounded() {
        let bound = max_abs_height();
        assert!((bound - 5.9).abs() < 1e-6);
        for i in 0..500 {
            let x = (i as f32 * 37.1).sin() * 1000.0;
            let z = (i as f32 * 11.9).cos() * 1000.0;
            assert!(height(x, z).abs() <= bound);
        }
    }

    #[test]
    fn normal_points_up_and_is_unit() {
        let n = terrain_normal(120.0, -40.0, NORMAL_EPSILON);
        assert!(n.y > 0.5);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shader_sources_embed_exact_coefficients() {
        let wgsl = height_wgsl();
        let glsl = height_glsl();
        for src in [&wgsl, &glsl] {
            assert!(src.contains("sin(p.x * 0.015 + p.y * 0.008) * 2.5;"), "{}", src);
            assert!(src.contains("sin(p.x * 0.005 + p.y * (-0.012)) * 3.0;"), "{}", src);
            assert!(src.contains("sin(p.x * 0.03 + p.y * 0.03) * 0.4;"), "{}", src);
            let terms = src.lines().filter(|l| l.starts_with("    h += sin(")).count();
            assert_eq!(terms, HEIGHT_TERMS.len());
        }
        assert!(wgsl.starts_with("fn terrain_height(p: vec2<f32>) -> f32 {"));
        assert!(glsl.starts_with("float getTerrainHeight(vec2 p) {"));
    }

    #[test]
    fn shader_literals_round_trip() {
        for term in &HEIGHT_TERMS {
            for v in [term.freq_x, term.freq_z, term.amplitude] {
                let lit = shader_literal(v);
                let parsed: f32 = lit.trim_matches(|c| c == '(' || c == ')').parse().unwrap();
                assert_eq!(parsed.to_bits(), v.to_bits());
            }
        }
    }
}
