//! Layer slicing and scanline filling.

use crate::mesh::TriangleMesh;

/// A 2D segment in the XY plane of one layer.
pub(crate) type Segment = ([f64; 2], [f64; 2]);

/// A triangle with its vertices and bounding Z range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Triangle {
    v: [[f64; 3]; 3],
    z_min: f64,
    z_max: f64,
}

/// Extract triangles from a mesh, widened to f64.
pub(crate) fn extract_triangles(mesh: &TriangleMesh) -> Vec<Triangle> {
    mesh.indices
        .chunks_exact(3)
        .map(|tri| {
            let v = [0, 1, 2].map(|c| {
                let p = mesh.vertex(tri[c] as usize);
                [p.x, p.y, p.z]
            });
            let z_min = v[0][2].min(v[1][2]).min(v[2][2]);
            let z_max = v[0][2].max(v[1][2]).max(v[2][2]);
            Triangle { v, z_min, z_max }
        })
        .collect()
}

/// Cut every triangle crossing the plane at `z`.
pub(crate) fn slice_at_z(triangles: &[Triangle], z: f64) -> Vec<Segment> {
    triangles
        .iter()
        .filter(|tri| tri.z_min <= z && z <= tri.z_max)
        .filter_map(|tri| triangle_plane_intersection(tri, z))
        .collect()
}

/// Intersect a triangle with a horizontal plane at Z.
///
/// Triangles lying in the plane, or touching it at a single vertex, give no
/// segment.
fn triangle_plane_intersection(tri: &Triangle, z: f64) -> Option<Segment> {
    let eps = 1e-10;
    let d = tri.v.map(|v| v[2] - z);

    if d.iter().all(|&di| di > eps) || d.iter().all(|&di| di < -eps) {
        return None;
    }

    let mut points: Vec<[f64; 2]> = Vec::with_capacity(3);
    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
        let (va, vb, da, db) = (tri.v[a], tri.v[b], d[a], d[b]);
        if (da > eps && db < -eps) || (da < -eps && db > eps) {
            let t = da / (da - db);
            points.push([va[0] + t * (vb[0] - va[0]), va[1] + t * (vb[1] - va[1])]);
        } else if da.abs() <= eps && db.abs() > eps {
            points.push([va[0], va[1]]);
        } else if db.abs() <= eps && da.abs() > eps {
            points.push([vb[0], vb[1]]);
        }
    }

    points.dedup_by(|a, b| {
        let dx = a[0] - b[0];
        let dy = a[1] - b[1];
        (dx * dx + dy * dy) < eps * eps
    });

    (points.len() >= 2).then(|| (points[0], points[1]))
}

/// X positions where the line at height `y` crosses the slice outline.
///
/// An endpoint counts as below the line when its y is `<= y`, so a vertex
/// shared by two consecutive segments is counted once.
pub(crate) fn row_crossings(segments: &[Segment], y: f64) -> Vec<f64> {
    let mut xs: Vec<f64> = segments
        .iter()
        .filter(|(a, b)| (a[1] <= y) != (b[1] <= y))
        .map(|(a, b)| a[0] + (y - a[1]) / (b[1] - a[1]) * (b[0] - a[0]))
        .collect();
    xs.sort_by(f64::total_cmp);
    xs
}

/// Regular row of voxel centres along X.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowLayout {
    /// X of the lower face of voxel 0.
    pub origin: f64,
    /// Voxels per unit length.
    pub scale: f64,
}

impl RowLayout {
    /// Voxels whose centre lies in `[x0, x1)`, clamped to the row.
    fn span(&self, x0: f64, x1: f64, len: usize) -> std::ops::Range<usize> {
        let first = ((x0 - self.origin) * self.scale - 0.5).ceil();
        let end = ((x1 - self.origin) * self.scale - 0.5).ceil();
        let clamp = |v: f64| v.clamp(0.0, len as f64) as usize;
        clamp(first)..clamp(end)
    }
}

/// Mark the voxels of `row` lying inside the outline, by the even-odd rule.
pub(crate) fn fill_row(row: &mut [u8], crossings: &[f64], layout: RowLayout) {
    for pair in crossings.chunks_exact(2) {
        let span = layout.span(pair[0], pair[1], row.len());
        for cell in &mut row[span] {
            *cell = 1;
        }
    }
}
