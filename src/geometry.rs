use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::scene::ShapeKind;

/// Lateral extent of the particle field on the x and z axes.
const PARTICLE_SPREAD: f32 = 10.0;

/// GPU ready mesh buffers for one section shape.
///
/// Vertices are laid out as `position.xyz` followed by `normal.xyz`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 6
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.vertices
            .extend_from_slice(&[position.x, position.y, position.z]);
        self.vertices
            .extend_from_slice(&[normal.x, normal.y, normal.z]);
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

/// Builds the mesh for a section shape with the showcase's stock parameters.
pub fn shape_mesh(kind: ShapeKind) -> MeshData {
    match kind {
        ShapeKind::Torus => torus(1.0, 0.4, 16, 60),
        ShapeKind::Cone => cone(1.0, 2.0, 32),
        ShapeKind::TorusKnot => torus_knot(0.8, 0.35, 100, 16, 2, 3),
    }
}

/// Ring of radius `radius` swept by a tube of radius `tube`, lying in the
/// xy plane.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            mesh.push_vertex(position, (position - center).normalize());
        }
    }

    let stride = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh
}

/// Cone with its apex at `+height / 2` and a flat cap at `-height / 2`.
pub fn cone(radius: f32, height: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half = height / 2.0;
    let slope = radius / height;

    // Lateral surface: one shared base ring, one apex vertex per segment so
    // each facet keeps a dedicated apex normal.
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let position = Vec3::new(radius * theta.cos(), -half, radius * theta.sin());
        let normal = Vec3::new(theta.cos(), slope, theta.sin()).normalize();
        mesh.push_vertex(position, normal);
    }
    let apex_base = mesh.vertex_count() as u32;
    for i in 0..segments {
        let theta = (i as f32 + 0.5) / segments as f32 * TAU;
        let normal = Vec3::new(theta.cos(), slope, theta.sin()).normalize();
        mesh.push_vertex(Vec3::new(0.0, half, 0.0), normal);
    }
    for i in 0..segments {
        mesh.push_triangle(i, apex_base + i, i + 1);
    }

    // Base cap.
    let cap_center = mesh.vertex_count() as u32;
    mesh.push_vertex(Vec3::new(0.0, -half, 0.0), Vec3::NEG_Y);
    let cap_base = mesh.vertex_count() as u32;
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let position = Vec3::new(radius * theta.cos(), -half, radius * theta.sin());
        mesh.push_vertex(position, Vec3::NEG_Y);
    }
    for i in 0..segments {
        mesh.push_triangle(cap_center, cap_base + i, cap_base + i + 1);
    }

    mesh
}

/// (p, q) torus knot: the tube winds `p` times around the torus axis and
/// `q` times around its interior circle.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=tubular_segments {
        let u = j as f32 / tubular_segments as f32 * p as f32 * TAU;
        let center = knot_point(u, p as f32, q as f32, radius);
        let ahead = knot_point(u + 0.01, p as f32, q as f32, radius);

        // Frenet-style frame from two nearby curve samples.
        let tangent = ahead - center;
        let binormal = tangent.cross(ahead + center).normalize();
        let normal_axis = binormal.cross(tangent).normalize();

        for i in 0..=radial_segments {
            let v = i as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = center + cx * normal_axis + cy * binormal;
            mesh.push_vertex(position, (position - center).normalize());
        }
    }

    let stride = radial_segments + 1;
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = stride * (j - 1) + i - 1;
            let b = stride * j + i - 1;
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh
}

fn knot_point(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let quotient = q / p * u;
    Vec3::new(
        radius * (2.0 + quotient.cos()) * 0.5 * u.cos(),
        radius * (2.0 + quotient.cos()) * 0.5 * u.sin(),
        radius * quotient.sin() * 0.5,
    )
}

/// Scatters `count` particles across the scroll range: x and z uniform over
/// the lateral spread, y covering every section plus half an object distance
/// of headroom. Seeded so a layout can be reproduced.
pub fn particle_field(count: u32, object_distance: f32, section_count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let depth = object_distance * section_count as f32;
    (0..count)
        .map(|_| {
            let x = (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD;
            let y = object_distance * 0.5 - rng.random::<f32>() * depth;
            let z = (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD;
            Vec3::new(x, y, z)
        })
        .collect()
}
