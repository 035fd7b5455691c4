//! Geometry utilities: tangent-space construction
//!
//! Computes per-vertex tangents from triangle positions and UVs. Each
//! triangle contributes additively to its three vertices' running tangent
//! sums; a final pass orthogonalizes every tangent against the vertex
//! normal and normalizes it. Contributions commute, so traversal order does
//! not affect the result beyond float rounding.

use crate::foundation::math::Vec3;
use crate::render::mesh::Vertex;

// Below this, the UV determinant is treated as degenerate and the triangle
// contributes nothing (the scale factor 1/det would be unbounded).
const UV_DETERMINANT_EPSILON: f32 = 1e-8;

/// Accumulate tangent contributions for every triangle, then orthonormalize
///
/// Out-of-range indices are a data error and fail fast via slice indexing;
/// callers that ingest untrusted data must bounds-check beforehand (the OBJ
/// importer does).
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );

        let p0 = Vec3::from(vertices[i0].position);
        let p1 = Vec3::from(vertices[i1].position);
        let p2 = Vec3::from(vertices[i2].position);

        let [u0, v0] = vertices[i0].tex_coord;
        let [u1, v1] = vertices[i1].tex_coord;
        let [u2, v2] = vertices[i2].tex_coord;

        let edge0 = p1 - p0;
        let edge1 = p2 - p0;

        // UV deltas of both edges; det is their 2D cross product
        let du = (u1 - u0, u2 - u0);
        let dv = (v1 - v0, v2 - v0);
        let det = du.0 * dv.1 - du.1 * dv.0;
        if det.abs() < UV_DETERMINANT_EPSILON {
            continue;
        }

        let tangent = (edge0 * dv.1 - edge1 * dv.0) / det;

        for &index in &[i0, i1, i2] {
            let sum = Vec3::from(vertices[index].tangent) + tangent;
            vertices[index].tangent = sum.into();
        }
    }

    for vertex in vertices.iter_mut() {
        let tangent = Vec3::from(vertex.tangent);
        let normal = Vec3::from(vertex.normal);

        // Gram-Schmidt: remove the component along the normal
        let orthogonal = tangent - normal * normal.dot(&tangent);
        if orthogonal.magnitude_squared() > UV_DETERMINANT_EPSILON {
            vertex.tangent = orthogonal.normalize().into();
        }
        // A zero accumulated tangent (all incident triangles degenerate in
        // UV space) is left as-is rather than normalized into NaN.
    }
}
