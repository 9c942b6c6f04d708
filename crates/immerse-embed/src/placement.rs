//! Placing a voxel grid in the target mesh frame.

use immerse_math::{Point3, Vec3};
use immerse_voxel::VoxelGrid;

/// Where a body goes in the target mesh.
///
/// A placement resolves to an offset that maps the body's own coordinates to
/// target coordinates: `x_global = x_local + offset`. It never changes the
/// grid itself, so one grid can be placed any number of times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Move the grid so its bounding-box center lands on this point.
    Center(Point3),
    /// Translate the grid by this vector.
    Offset(Vec3),
}

impl Placement {
    /// Center the grid on `target`.
    pub fn centered_at(target: Point3) -> Self {
        Placement::Center(target)
    }

    /// Translate the grid by `offset`.
    pub fn offset(offset: Vec3) -> Self {
        Placement::Offset(offset)
    }

    /// Offset that applies this placement to `grid`.
    pub fn resolve(&self, grid: &VoxelGrid) -> Vec3 {
        match self {
            Placement::Center(target) => *target - grid.bounding_box().center(),
            Placement::Offset(offset) => *offset,
        }
    }
}

impl Default for Placement {
    /// Centered on the target-frame origin.
    fn default() -> Self {
        Placement::Center(Point3::origin())
    }
}

/// Map a target-frame point into the frame of a grid placed with `offset`.
pub fn to_local(global: &Point3, offset: &Vec3) -> Point3 {
    *global - *offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use immerse_math::Shape3;

    fn grid() -> VoxelGrid {
        // Spans [1, 3] x [-1, 1] x [0, 4].
        VoxelGrid::filled(
            Shape3::new(4, 4, 8),
            1,
            Vec3::new(2.0, 2.0, 2.0),
            Point3::new(1.0, -1.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_center_offset() {
        let offset = Placement::centered_at(Point3::new(0.5, 0.5, 0.5)).resolve(&grid());
        assert_eq!(offset, Vec3::new(-1.5, 0.5, -1.5));
        let moved = grid().bounding_box().translated(&offset);
        assert_eq!(moved.center(), Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_default_centers_on_origin() {
        let offset = Placement::default().resolve(&grid());
        assert_eq!(offset, Vec3::new(-2.0, 0.0, -2.0));
    }

    #[test]
    fn test_raw_offset_passes_through() {
        let v = Vec3::new(3.0, -2.0, 1.0);
        assert_eq!(Placement::offset(v).resolve(&grid()), v);
    }

    #[test]
    fn test_to_local_inverts_offset() {
        let offset = Vec3::new(0.25, -1.0, 2.0);
        let local = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(to_local(&(local + offset), &offset), local);
    }

    #[test]
    fn test_placements_are_independent() {
        let g = grid();
        let a = Placement::centered_at(Point3::new(10.0, 0.0, 0.0));
        let b = Placement::centered_at(Point3::new(-10.0, 0.0, 0.0));
        let off_a = a.resolve(&g);
        let off_b = b.resolve(&g);
        assert_eq!(off_a - off_b, Vec3::new(20.0, 0.0, 0.0));
        // Resolving again after another placement gives the same answer.
        assert_eq!(a.resolve(&g), off_a);
    }
}
