use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::tiles::ShapeClass;
use crate::tiles::shape::Points;

/// A tile shape projected into world space.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldShape {
    pub class: ShapeClass,
    pub interactive: bool,
    /// Position of the authored shape in its tile's shape list.
    pub source_index: usize,
    pub points: Points,
}

impl WorldShape {
    /// Returns (min, max) of the shape's bounding box.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }

    /// Bounding box overlap test; touching edges do not overlap.
    pub fn overlaps_bounds(&self, other: &WorldShape) -> bool {
        let (min_a, max_a) = self.bounds();
        let (min_b, max_b) = other.bounds();
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }

    /// Even-odd point containment against the polygon outline.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Resolved world-space shapes of an entity, in authored order.
///
/// Refreshed by [`world_shapes`](crate::systems::collision::world_shapes)
/// whenever the entity's tile, position or flip changes.
#[derive(Component, Clone, Debug, Default)]
pub struct WorldShapes(pub Vec<WorldShape>);

impl WorldShapes {
    pub fn iter(&self) -> impl Iterator<Item = &WorldShape> {
        self.0.iter()
    }

    pub fn of_class(&self, class: ShapeClass) -> impl Iterator<Item = &WorldShape> {
        self.0.iter().filter(move |s| s.class == class)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
