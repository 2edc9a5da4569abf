//! Render collaborator seam
//!
//! The world keeps one visual handle per live entity and asks the surface
//! which handles overlap a box. [`HeadlessSurface`] is an in-memory surface
//! with no drawing, used by the binary and the tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::body::Aabb;

/// Fill colour hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    White,
    Red,
    Grey,
}

/// What the surface should draw for a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Ellipse inscribed in the bounding box
    Oval { fill: Tint },
}

/// Opaque visual handle issued by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(pub u64);

/// Visual collaborator consumed by the world
pub trait RenderSurface {
    fn create_handle(&mut self, shape: Shape, bounds: Aabb) -> SurfaceHandle;
    fn move_handle(&mut self, handle: SurfaceHandle, bounds: Aabb);
    fn destroy_handle(&mut self, handle: SurfaceHandle);
    /// Every handle whose box overlaps `bounds`, including one at `bounds` itself
    fn query_overlapping(&self, bounds: Aabb) -> Vec<SurfaceHandle>;
}

/// A drawn item held by [`HeadlessSurface`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub shape: Shape,
    pub bounds: Aabb,
}

/// Surface that only tracks boxes
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    items: BTreeMap<SurfaceHandle, Item>,
    next_handle: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, handle: SurfaceHandle) -> Option<&Item> {
        self.items.get(&handle)
    }
}

impl RenderSurface for HeadlessSurface {
    fn create_handle(&mut self, shape: Shape, bounds: Aabb) -> SurfaceHandle {
        self.next_handle += 1;
        let handle = SurfaceHandle(self.next_handle);
        self.items.insert(handle, Item { shape, bounds });
        handle
    }

    fn move_handle(&mut self, handle: SurfaceHandle, bounds: Aabb) {
        if let Some(item) = self.items.get_mut(&handle) {
            item.bounds = bounds;
        }
    }

    fn destroy_handle(&mut self, handle: SurfaceHandle) {
        self.items.remove(&handle);
    }

    fn query_overlapping(&self, bounds: Aabb) -> Vec<SurfaceHandle> {
        self.items
            .iter()
            .filter(|(_, item)| item.bounds.overlaps(&bounds))
            .map(|(handle, _)| *handle)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn square(x: f64, y: f64, size: f64) -> Aabb {
        Aabb::new(DVec2::new(x, y), DVec2::new(x + size, y + size))
    }

    #[test]
    fn test_handles_are_unique() {
        let mut surface = HeadlessSurface::new();
        let shape = Shape::Oval { fill: Tint::Grey };
        let a = surface.create_handle(shape, square(0.0, 0.0, 5.0));
        let b = surface.create_handle(shape, square(0.0, 0.0, 5.0));
        assert_ne!(a, b);
        assert_eq!(surface.len(), 2);
    }

    #[test]
    fn test_query_includes_self_and_overlaps() {
        let mut surface = HeadlessSurface::new();
        let shape = Shape::Oval { fill: Tint::White };
        let a = surface.create_handle(shape, square(0.0, 0.0, 10.0));
        let b = surface.create_handle(shape, square(8.0, 8.0, 10.0));
        let c = surface.create_handle(shape, square(50.0, 50.0, 10.0));

        let hits = surface.query_overlapping(square(0.0, 0.0, 10.0));
        assert_eq!(hits, vec![a, b]);

        surface.move_handle(c, square(5.0, 5.0, 2.0));
        assert_eq!(surface.query_overlapping(square(0.0, 0.0, 10.0)).len(), 3);
    }

    #[test]
    fn test_destroy_removes_from_queries() {
        let mut surface = HeadlessSurface::new();
        let a = surface.create_handle(Shape::Oval { fill: Tint::Red }, square(0.0, 0.0, 10.0));
        surface.destroy_handle(a);
        assert!(surface.is_empty());
        assert!(surface.query_overlapping(square(0.0, 0.0, 10.0)).is_empty());
        assert!(surface.item(a).is_none());
    }
}
