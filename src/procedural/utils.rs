//! Utilities useful for various generations tasks.

use glamx::Vec3;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Computes the normals of a set of vertices.
///
/// Each vertex normal is the normalized sum of the normals of its adjacent faces.
#[inline]
pub fn compute_normals(coordinates: &[Vec3], faces: &[[u32; 3]], normals: &mut Vec<Vec3>) {
    let mut divisor: Vec<f32> = vec![0.0; coordinates.len()];

    normals.clear();
    normals.extend(std::iter::repeat_n(Vec3::ZERO, coordinates.len()));

    for f in faces.iter() {
        let edge1 = coordinates[f[1] as usize] - coordinates[f[0] as usize];
        let edge2 = coordinates[f[2] as usize] - coordinates[f[0] as usize];
        let cross = edge1.cross(edge2);
        let normal = cross.normalize_or_zero();

        for &i in f.iter() {
            normals[i as usize] += normal;
            divisor[i as usize] += 1.0;
        }
    }

    for (n, divisor) in normals.iter_mut().zip(divisor.iter()) {
        if *divisor != 0.0 {
            *n = (*n / *divisor).normalize_or_zero();
        }
    }
}

/// Cache of edge midpoints, so that subdividing neighbouring triangles
/// produces a watertight mesh.
#[derive(Default)]
pub struct MidpointCache {
    midpoints: HashMap<(u32, u32), u32>,
}

impl MidpointCache {
    /// Index of the (sphere-projected) midpoint of the edge `a`-`b`, pushing
    /// it to `coords` the first time it is requested.
    pub fn midpoint(&mut self, a: u32, b: u32, coords: &mut Vec<Vec3>) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };

        match self.midpoints.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let mid = (coords[a as usize] + coords[b as usize]) * 0.5;
                coords.push(mid.normalize());
                let id = coords.len() as u32 - 1;
                let _ = e.insert(id);
                id
            }
        }
    }
}
