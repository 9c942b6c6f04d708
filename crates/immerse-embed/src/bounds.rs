//! Index-space loop bounds for rasterizing a placed body.

use std::fmt;
use std::ops::Range;

use immerse_math::Aabb3;

use crate::mesh::TargetMesh;

/// Half-open index ranges `[n0, nn)` on each axis of a target mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBounds {
    /// Range of x indices.
    pub x: Range<usize>,
    /// Range of y indices.
    pub y: Range<usize>,
    /// Range of z indices.
    pub z: Range<usize>,
}

impl IndexBounds {
    /// Bounds of the mesh points a world-space box can touch.
    ///
    /// Each axis covers every point whose coordinate lies in the closed
    /// interval `[bbox.min, bbox.max]`, clamped to the mesh.
    pub fn covering(bbox: &Aabb3, mesh: &TargetMesh) -> Self {
        let shape = mesh.shape();
        let d = mesh.spacing();
        Self {
            x: axis_range(bbox.min.x, bbox.max.x, d.x, shape.x),
            y: axis_range(bbox.min.y, bbox.max.y, d.y, shape.y),
            z: axis_range(bbox.min.z, bbox.max.z, d.z, shape.z),
        }
    }

    /// True if no index lies inside the bounds.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Number of index triples inside the bounds.
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }

    /// True if `(i, j, k)` lies inside the bounds.
    pub fn contains(&self, i: usize, j: usize, k: usize) -> bool {
        self.x.contains(&i) && self.y.contains(&j) && self.z.contains(&k)
    }
}

impl fmt::Display for IndexBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}] -> [{}, {}, {}]",
            self.x.start, self.y.start, self.z.start, self.x.end, self.y.end, self.z.end
        )
    }
}

/// Indices `[n0, nn)` of the points at `i * spacing` inside `[lo, hi]`.
///
/// The upper bound is `floor(hi / spacing) + 1` rather than `ceil`, so a box
/// ending exactly on a grid line still covers that line. A zero spacing
/// means a single point at coordinate 0.
fn axis_range(lo: f64, hi: f64, spacing: f64, n: usize) -> Range<usize> {
    if spacing == 0.0 {
        return if lo <= 0.0 && hi >= 0.0 { 0..n.min(1) } else { 0..0 };
    }
    let start = clamp_index((lo / spacing).floor(), n);
    let end = clamp_index((hi / spacing).floor() + 1.0, n);
    start..end.max(start)
}

fn clamp_index(v: f64, n: usize) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= n as f64 {
        n
    } else {
        v as usize
    }
}
