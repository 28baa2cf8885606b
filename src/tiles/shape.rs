//! Collision and interaction shapes attached to tiles.
//!
//! A [`GeometryShape`] is authored in tile-local coordinates (top-left origin,
//! y pointing down). Its vertices are relative to [`GeometryShape::origin`] and
//! the shape is rotated clockwise about that origin by `rotation` degrees.

use glam::Vec2;
use smallvec::{SmallVec, smallvec};

/// Vertex list used for shapes; most tile shapes have 4 vertices or fewer.
pub type Points = SmallVec<[Vec2; 8]>;

/// How a contact with a shape is interpreted by the physics/combat side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeClass {
    /// Blocks motion.
    Solid,
    /// Reports overlap without blocking.
    Sensor,
    /// Deals damage on overlap.
    Attack,
    /// Blocks only downward motion onto the platform from above.
    OneWayDrop,
}

impl ShapeClass {
    /// Derive the class from authored flags.
    ///
    /// `shape_drop` is the shape's own `drop` property, if set; it overrides
    /// the tile-level `drop` flag in either direction.
    pub fn from_flags(sensor: bool, attack: bool, shape_drop: Option<bool>, tile_drop: bool) -> Self {
        if sensor {
            ShapeClass::Sensor
        } else if attack {
            ShapeClass::Attack
        } else if shape_drop.unwrap_or(tile_drop) {
            ShapeClass::OneWayDrop
        } else {
            ShapeClass::Solid
        }
    }

    /// Whether a contact with this shape stops motion in some direction.
    pub fn blocks(self) -> bool {
        matches!(self, ShapeClass::Solid | ShapeClass::OneWayDrop)
    }
}

/// Geometry of a shape, relative to its origin.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle { width: f32, height: f32 },
    /// Simple polygon with at least 3 vertices; may extend outside the tile.
    Polygon { points: Points },
}

/// One collision/interaction shape of a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryShape {
    /// Authored object name such as `foot` or `attk`.
    pub name: Option<String>,
    pub origin: Vec2,
    /// Degrees, clockwise, about `origin`.
    pub rotation: f32,
    pub kind: ShapeKind,
    pub class: ShapeClass,
    /// Switches and doors: sensors the player can act on.
    pub interactive: bool,
}

impl GeometryShape {
    pub fn rectangle(origin: Vec2, width: f32, height: f32, class: ShapeClass) -> Self {
        Self {
            name: None,
            origin,
            rotation: 0.0,
            kind: ShapeKind::Rectangle { width, height },
            class,
            interactive: false,
        }
    }

    pub fn polygon(origin: Vec2, points: impl IntoIterator<Item = Vec2>, class: ShapeClass) -> Self {
        Self {
            name: None,
            origin,
            rotation: 0.0,
            kind: ShapeKind::Polygon {
                points: points.into_iter().collect(),
            },
            class,
            interactive: false,
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Vertices relative to `origin`, before rotation.
    ///
    /// Rectangles expand to their corners in clockwise order starting at the
    /// origin corner.
    pub fn relative_points(&self) -> Points {
        match &self.kind {
            ShapeKind::Rectangle { width, height } => smallvec![
                Vec2::ZERO,
                Vec2::new(*width, 0.0),
                Vec2::new(*width, *height),
                Vec2::new(0.0, *height),
            ],
            ShapeKind::Polygon { points } => points.clone(),
        }
    }

    /// Vertices in tile-local space: rotated about `origin`, then translated by it.
    pub fn local_points(&self) -> Points {
        let mut points = self.relative_points();
        if self.rotation != 0.0 {
            let (sin, cos) = self.rotation.to_radians().sin_cos();
            for p in points.iter_mut() {
                *p = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos);
            }
        }
        for p in points.iter_mut() {
            *p += self.origin;
        }
        points
    }

    pub fn vertex_count(&self) -> usize {
        match &self.kind {
            ShapeKind::Rectangle { .. } => 4,
            ShapeKind::Polygon { points } => points.len(),
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        let dims_finite = match &self.kind {
            ShapeKind::Rectangle { width, height } => width.is_finite() && height.is_finite(),
            ShapeKind::Polygon { points } => points.iter().all(|p| p.is_finite()),
        };
        dims_finite && self.origin.is_finite() && self.rotation.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_class_precedence() {
        assert_eq!(ShapeClass::from_flags(false, false, None, false), ShapeClass::Solid);
        assert_eq!(ShapeClass::from_flags(true, false, None, true), ShapeClass::Sensor);
        assert_eq!(ShapeClass::from_flags(false, true, None, true), ShapeClass::Attack);
        assert_eq!(ShapeClass::from_flags(false, false, None, true), ShapeClass::OneWayDrop);
    }

    #[test]
    fn test_shape_drop_overrides_tile_drop() {
        assert_eq!(ShapeClass::from_flags(false, false, Some(false), true), ShapeClass::Solid);
        assert_eq!(ShapeClass::from_flags(false, false, Some(true), false), ShapeClass::OneWayDrop);
    }

    #[test]
    fn test_rectangle_local_points_unrotated() {
        let shape = GeometryShape::rectangle(Vec2::new(10.0, 17.0), 12.0, 13.0, ShapeClass::Solid);
        let pts = shape.local_points();
        assert_eq!(pts.len(), 4);
        assert!(approx(pts[0], Vec2::new(10.0, 17.0)));
        assert!(approx(pts[2], Vec2::new(22.0, 30.0)));
    }

    #[test]
    fn test_rotation_is_clockwise_about_origin() {
        // cliffs tile 45: polygon rotated 180 degrees about (0,16)
        let shape = GeometryShape::polygon(
            Vec2::new(0.0, 16.0),
            [Vec2::new(0.0, 0.0), Vec2::new(-16.0, 16.0), Vec2::new(0.0, 16.0)],
            ShapeClass::Solid,
        )
        .with_rotation(180.0);
        let pts = shape.local_points();
        assert!(approx(pts[0], Vec2::new(0.0, 16.0)));
        assert!(approx(pts[1], Vec2::new(16.0, 0.0)));
        assert!(approx(pts[2], Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_rotation_90_maps_x_axis_to_y_axis() {
        let shape = GeometryShape::rectangle(Vec2::ZERO, 4.0, 2.0, ShapeClass::Solid).with_rotation(90.0);
        let pts = shape.local_points();
        assert!(approx(pts[1], Vec2::new(0.0, 4.0)));
        assert!(approx(pts[3], Vec2::new(-2.0, 0.0)));
    }

    #[test]
    fn test_non_finite_detection() {
        let shape = GeometryShape::rectangle(Vec2::new(f32::NAN, 0.0), 1.0, 1.0, ShapeClass::Solid);
        assert!(!shape.is_finite());
    }
}
