//! Equiangular gnomonic cubed-sphere mesh generator.
//!
//! Each of the six cube panels is split into `ne × ne` quadrilaterals whose
//! corners are equally spaced in central angle, then projected radially onto
//! the unit sphere. Panel edges and corners are shared, giving
//! `6 ne² + 2` vertices and `6 ne²` counter-clockwise faces.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_4;

use crate::types::Vec3;

use super::sphere_mesh::{Face, SphereMesh};

/// Panel frames: (normal axis, normal sign, first tangent axis, second tangent axis).
///
/// The tangent axes satisfy e1 × e2 = sign · normal, so quads traversed
/// (u, v) → (u+1, v) → (u+1, v+1) → (u, v+1) are counter-clockwise from outside.
const PANELS: [(usize, i64, usize, usize); 6] = [
    (0, 1, 1, 2),
    (1, 1, 2, 0),
    (0, -1, 2, 1),
    (1, -1, 0, 2),
    (2, 1, 0, 1),
    (2, -1, 1, 0),
];

impl SphereMesh {
    /// Generate an equiangular cubed-sphere mesh with `ne × ne` faces per panel.
    ///
    /// # Panics
    /// Panics if `ne == 0`.
    pub fn cubed_sphere(ne: usize) -> Self {
        assert!(ne > 0, "Need at least one element per panel edge");

        let ne_i = ne as i64;
        let mut vertices: Vec<[f64; 3]> = Vec::with_capacity(6 * ne * ne + 2);
        let mut lattice_to_vertex: HashMap<[i64; 3], usize> = HashMap::new();
        let mut faces = Vec::with_capacity(6 * ne * ne);

        // Lattice coordinates run over {-ne, -ne+2, ..., ne} on every axis, so
        // points on shared panel edges get the same key from both panels.
        let mut vertex_at = |key: [i64; 3]| -> usize {
            *lattice_to_vertex.entry(key).or_insert_with(|| {
                vertices.push(lattice_to_sphere(key, ne_i));
                vertices.len() - 1
            })
        };

        for &(normal, sign, e1, e2) in &PANELS {
            for v in 0..ne_i {
                for u in 0..ne_i {
                    let corner = |du: i64, dv: i64| {
                        let mut key = [0i64; 3];
                        key[normal] = sign * ne_i;
                        key[e1] = -ne_i + 2 * (u + du);
                        key[e2] = -ne_i + 2 * (v + dv);
                        key
                    };
                    faces.push(vec![
                        vertex_at(corner(0, 0)),
                        vertex_at(corner(1, 0)),
                        vertex_at(corner(1, 1)),
                        vertex_at(corner(0, 1)),
                    ]);
                }
            }
        }

        // Connectivity is valid by construction.
        let mut mesh = Self {
            vertices,
            faces: faces
                .into_iter()
                .map(|vertices| Face { vertices, area: 0.0 })
                .collect(),
        };
        mesh.calculate_face_areas();
        mesh
    }
}

/// Map a cube-surface lattice point to the unit sphere.
fn lattice_to_sphere(key: [i64; 3], ne: i64) -> [f64; 3] {
    let cube = key.map(|c| {
        if c.abs() == ne {
            c.signum() as f64
        } else {
            (FRAC_PI_4 * c as f64 / ne as f64).tan()
        }
    });
    // The cube point has at least one unit component, so it is never zero.
    cube.scale(1.0 / cube.norm())
}
