//! Oriented bounding boxes
//!
//! Every hull, shot and pickup collides as a rotated rectangle. Overlap is
//! decided with the Separating Axis Theorem over the four face normals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{rotate_vector, wrap_angle};

/// A rectangle rotated about its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    pub center: Vec2,
    /// Unrotated width (along the heading) and height
    pub size: Vec2,
    /// Rotation in radians, wrapped to (-π, π]
    pub angle: f32,
    /// Half-width vector after rotation
    pub half_x: Vec2,
    /// Half-height vector after rotation
    pub half_y: Vec2,
    /// Unit axis along `half_x`
    pub axis_x: Vec2,
    /// Unit axis along `half_y`
    pub axis_y: Vec2,
}

impl OrientedBox {
    pub fn new(center: Vec2, size: Vec2, angle: f32) -> Self {
        let mut obb = Self {
            center,
            size,
            angle: 0.0,
            half_x: Vec2::new(size.x / 2.0, 0.0),
            half_y: Vec2::new(0.0, size.y / 2.0),
            axis_x: Vec2::X,
            axis_y: Vec2::Y,
        };
        obb.rotate_axis(angle);
        obb
    }

    /// Re-orient the box, recomputing half-extents and axes from the unrotated size
    pub fn rotate_axis(&mut self, angle: f32) {
        self.angle = wrap_angle(angle);
        self.half_x = rotate_vector(Vec2::new(self.size.x / 2.0, 0.0), self.angle);
        self.half_y = rotate_vector(Vec2::new(0.0, self.size.y / 2.0), self.angle);
        // Axes come straight from the rotation so they stay orthonormal even
        // when a dimension is zero.
        self.axis_x = rotate_vector(Vec2::X, self.angle);
        self.axis_y = rotate_vector(Vec2::Y, self.angle);
    }

    /// Zero, negative or non-finite dimensions never collide
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0 && self.size.is_finite() && self.center.is_finite())
    }

    /// Distance from center to any corner
    #[inline]
    pub fn half_diagonal(&self) -> f32 {
        (self.size / 2.0).length()
    }

    /// Half the box's extent when projected onto `axis`
    #[inline]
    fn projected_radius(&self, axis: Vec2) -> f32 {
        self.half_x.dot(axis).abs() + self.half_y.dot(axis).abs()
    }

    /// SAT overlap test. Touching edges count as overlap.
    pub fn intersects(&self, other: &OrientedBox) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }

        let delta = other.center - self.center;

        // Broad phase: boxes further apart than their circumscribed circles
        let reach = self.half_diagonal() + other.half_diagonal();
        if delta.length_squared() > reach * reach {
            return false;
        }

        // Unrotated pairs reduce to the axis-aligned test
        if self.angle == 0.0 && other.angle == 0.0 {
            return self.intersects_aabb(other);
        }

        let axes = [self.axis_x, self.axis_y, other.axis_x, other.axis_y];
        axes.iter().all(|&axis| {
            let distance = delta.dot(axis).abs();
            let extent = self.projected_radius(axis) + other.projected_radius(axis);
            distance <= extent
        })
    }

    /// Cheap axis-aligned check on the unrotated dimensions
    pub fn intersects_aabb(&self, other: &OrientedBox) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        let gap = (other.center - self.center).abs();
        let reach = (self.size + other.size) / 2.0;
        gap.x <= reach.x && gap.y <= reach.y
    }
}
