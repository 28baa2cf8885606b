//! World-space collision geometry.
//!
//! [`resolve_world_shapes`] is the pure transform from a tile's authored
//! shapes to world polygons. The [`world_shapes`] system keeps each placed
//! instance's [`WorldShapes`] in step with its tile, position and flips.

use bevy_ecs::prelude::*;
use glam::{UVec2, Vec2};
use log::warn;

use crate::components::mapposition::MapPosition;
use crate::components::tileinstance::{TileFlip, TileInstance};
use crate::components::worldshapes::{WorldShape, WorldShapes};
use crate::resources::tilesetstore::TilesetStore;
use crate::tiles::TileDefinition;

/// Placement of a tile in the world.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InstanceTransform {
    pub position: Vec2,
    pub flip: TileFlip,
}

impl InstanceTransform {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            flip: TileFlip::NONE,
        }
    }

    pub fn with_flip(mut self, flip: TileFlip) -> Self {
        self.flip = flip;
        self
    }

    /// Map a tile-local point of a tile of `size` into world space.
    ///
    /// Flips mirror about the tile centre before translating.
    pub fn apply(&self, local: Vec2, size: UVec2) -> Vec2 {
        let size = size.as_vec2();
        let mut p = local;
        if self.flip.horizontal {
            p.x = size.x - p.x;
        }
        if self.flip.vertical {
            p.y = size.y - p.y;
        }
        p + self.position
    }
}

/// Project every shape of `def` into world space, preserving authored order.
///
/// Collinear or otherwise odd polygons pass through untouched. A tile without
/// shapes yields nothing.
pub fn resolve_world_shapes(def: &TileDefinition, transform: &InstanceTransform) -> Vec<WorldShape> {
    def.shapes
        .iter()
        .enumerate()
        .map(|(source_index, shape)| WorldShape {
            class: shape.class,
            interactive: shape.interactive,
            source_index,
            points: shape
                .local_points()
                .into_iter()
                .map(|p| transform.apply(p, def.size))
                .collect(),
        })
        .collect()
}

type ShapeRefreshFilter = Or<(Changed<TileInstance>, Changed<MapPosition>, Changed<TileFlip>)>;

/// Refresh [`WorldShapes`] of instances whose tile, position or flip changed.
///
/// Tiles with `collide=false` get no shapes. Unknown tiles are logged and
/// left without shapes.
pub fn world_shapes(
    mut query: Query<
        (
            Entity,
            &TileInstance,
            &MapPosition,
            Option<&TileFlip>,
            &mut WorldShapes,
        ),
        ShapeRefreshFilter,
    >,
    store: Res<TilesetStore>,
) {
    for (entity, instance, position, flip, mut shapes) in query.iter_mut() {
        shapes.0.clear();
        let def = match store.lookup(instance.tileset.as_str(), instance.tile) {
            Ok(def) => def,
            Err(err) => {
                warn!("Entity {:?} has no shapes: {}", entity, err);
                continue;
            }
        };
        if !def.collision_enabled() {
            continue;
        }
        let transform = InstanceTransform::new(position.pos).with_flip(flip.copied().unwrap_or_default());
        shapes.0.extend(resolve_world_shapes(def, &transform));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{GeometryShape, Properties, ShapeClass, TilesetId};

    fn tile(shapes: Vec<GeometryShape>) -> TileDefinition {
        TileDefinition {
            tileset: TilesetId::from("test.json"),
            local_id: 0,
            size: UVec2::new(32, 32),
            shapes,
            properties: Properties::default(),
            animation: None,
        }
    }

    #[test]
    fn test_no_shapes_yields_empty() {
        let def = tile(Vec::new());
        assert!(resolve_world_shapes(&def, &InstanceTransform::new(Vec2::new(5.0, 5.0))).is_empty());
    }

    #[test]
    fn test_translate_rectangle() {
        let def = tile(vec![GeometryShape::rectangle(
            Vec2::new(10.0, 17.0),
            12.0,
            13.0,
            ShapeClass::Solid,
        )]);
        let shapes = resolve_world_shapes(&def, &InstanceTransform::new(Vec2::new(100.0, 100.0)));
        assert_eq!(shapes.len(), 1);
        let (min, max) = shapes[0].bounds();
        assert_eq!(min, Vec2::new(110.0, 117.0));
        assert_eq!(max, Vec2::new(122.0, 130.0));
        assert_eq!(shapes[0].class, ShapeClass::Solid);
    }

    #[test]
    fn test_horizontal_flip_mirrors_about_centre() {
        let def = tile(vec![GeometryShape::rectangle(
            Vec2::new(0.0, 4.0),
            8.0,
            8.0,
            ShapeClass::Solid,
        )]);
        let transform = InstanceTransform::new(Vec2::ZERO).with_flip(TileFlip::horizontal());
        let shapes = resolve_world_shapes(&def, &transform);
        // vertex order is kept, so the first corner is now the right edge
        assert_eq!(shapes[0].points[0], Vec2::new(32.0, 4.0));
        let (min, max) = shapes[0].bounds();
        assert_eq!(min, Vec2::new(24.0, 4.0));
        assert_eq!(max, Vec2::new(32.0, 12.0));
    }

    #[test]
    fn test_vertical_flip_after_rotation() {
        let def = tile(vec![
            GeometryShape::rectangle(Vec2::new(16.0, 0.0), 4.0, 2.0, ShapeClass::Solid).with_rotation(90.0),
        ]);
        let transform = InstanceTransform::new(Vec2::new(1.0, 1.0)).with_flip(TileFlip::vertical());
        let shapes = resolve_world_shapes(&def, &transform);
        // rotated corner (0,4) -> local (16,4) -> flipped (16,28) -> world (17,29)
        assert!((shapes[0].points[1] - Vec2::new(17.0, 29.0)).length() < 1e-4);
    }

    #[test]
    fn test_order_and_classes_preserved() {
        let def = tile(vec![
            GeometryShape::rectangle(Vec2::ZERO, 1.0, 1.0, ShapeClass::Attack),
            GeometryShape::rectangle(Vec2::ZERO, 1.0, 1.0, ShapeClass::Solid),
            GeometryShape::rectangle(Vec2::ZERO, 1.0, 1.0, ShapeClass::Sensor),
        ]);
        let shapes = resolve_world_shapes(&def, &InstanceTransform::default());
        let classes: Vec<_> = shapes.iter().map(|s| s.class).collect();
        assert_eq!(classes, vec![ShapeClass::Attack, ShapeClass::Solid, ShapeClass::Sensor]);
        assert_eq!(shapes[2].source_index, 2);
    }
}
