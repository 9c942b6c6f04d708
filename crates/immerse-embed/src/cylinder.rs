//! Analytic cylinder bodies.

use immerse_math::{Aabb3, Point3, Vec3};

use crate::error::{EmbedError, Result};

/// An infinite circular cylinder given by its radius, a point on its axis and
/// the axis direction.
///
/// A mesh point is inside when its distance to the axis is at most the
/// radius, so points exactly on the surface are solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    radius: f64,
    origin: Point3,
    axis: Vec3,
}

impl Cylinder {
    /// Create a cylinder. `axis` need not be normalized.
    pub fn new(radius: f64, origin: Point3, axis: Vec3) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(EmbedError::InvalidCylinder(format!(
                "radius must be positive, got {radius}"
            )));
        }
        if !origin.coords.iter().all(|c| c.is_finite()) {
            return Err(EmbedError::InvalidCylinder(format!(
                "origin must be finite, got {origin}"
            )));
        }
        let axis = axis
            .iter()
            .all(|c| c.is_finite())
            .then(|| axis.try_normalize(f64::EPSILON))
            .flatten()
            .ok_or_else(|| {
                EmbedError::InvalidCylinder(format!(
                    "axis must be a finite non-zero vector, got [{}, {}, {}]",
                    axis.x, axis.y, axis.z
                ))
            })?;
        Ok(Self {
            radius,
            origin,
            axis,
        })
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Point on the axis.
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Unit axis direction.
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Distance from `p` to the axis.
    pub fn radial_distance(&self, p: &Point3) -> f64 {
        let d = p - self.origin;
        (d - self.axis * d.dot(&self.axis)).norm()
    }

    /// True if `p` lies inside or on the surface.
    pub fn contains(&self, p: &Point3) -> bool {
        self.radial_distance(p) <= self.radius
    }

    /// World-space box holding the cylinder.
    ///
    /// The cylinder is unbounded along every world axis its own axis is not
    /// perpendicular to; those sides of the box are infinite.
    pub fn bounding_box(&self) -> Aabb3 {
        let extent = |o: f64, a: f64| {
            if a == 0.0 {
                (o - self.radius, o + self.radius)
            } else {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
        };
        let (x0, x1) = extent(self.origin.x, self.axis.x);
        let (y0, y1) = extent(self.origin.y, self.axis.y);
        let (z0, z1) = extent(self.origin.z, self.axis.z);
        Aabb3::new(Point3::new(x0, y0, z0), Point3::new(x1, y1, z1))
    }
}
