//! Circular solids and the registry movers test against.

use glam::{Vec2, Vec3};

/// A static circular obstacle in the XZ plane with unbounded height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solid {
    pub x: f32,
    pub z: f32,
    /// Radius in world units.
    pub r: f32,
}

impl Solid {
    pub fn new(x: f32, z: f32, r: f32) -> Self {
        Self { x, z, r }
    }

    /// Center in the XZ plane.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    /// True if a circle of `radius` centred at `point` (XZ) penetrates this solid.
    /// Touching is not an overlap.
    #[inline]
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        let dx = point.x - self.x;
        let dz = point.y - self.z;
        let min_dist = radius + self.r;
        dx * dx + dz * dz < min_dist * min_dist
    }
}

/// Ordered set of static solids for the current world.
///
/// Populated once by world generation and never edited afterwards. An empty registry
/// is valid and means nothing blocks movement.
#[derive(Debug, Default, Clone)]
pub struct CollisionRegistry {
    solids: Vec<Solid>,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole registry with `solids`.
    pub fn register(&mut self, solids: impl IntoIterator<Item = Solid>) {
        self.solids = solids.into_iter().collect();
        log::info!("Collision registry populated with {} solids", self.solids.len());
    }

    /// Every registered solid, in registration order.
    pub fn all(&self) -> &[Solid] {
        &self.solids
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// First solid (in registration order) that a circle of `radius` at `point`
    /// would penetrate. Only X and Z of `point` are used.
    pub fn first_overlap(&self, point: Vec3, radius: f32) -> Option<&Solid> {
        let p = Vec2::new(point.x, point.z);
        self.solids.iter().find(|s| s.overlaps(p, radius))
    }

    /// Whether a circle of `radius` at `point` would penetrate any solid.
    pub fn is_blocked(&self, point: Vec3, radius: f32) -> bool {
        self.first_overlap(point, radius).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_blocks_nothing() {
        let reg = CollisionRegistry::new();
        assert!(reg.is_empty());
        assert!(!reg.is_blocked(Vec3::ZERO, 0.6));
    }

    #[test]
    fn register_replaces_previous_contents() {
        let mut reg = CollisionRegistry::new();
        reg.register(vec![Solid::new(0.0, 0.0, 1.0), Solid::new(10.0, 0.0, 1.0)]);
        assert_eq!(reg.len(), 2);
        reg.register(vec![Solid::new(50.0, 50.0, 2.0)]);
        assert_eq!(reg.all(), &[Solid::new(50.0, 50.0, 2.0)]);
    }

    #[test]
    fn overlap_uses_sum_of_radii_and_ignores_height() {
        let mut reg = CollisionRegistry::new();
        reg.register(vec![Solid::new(5.0, 0.0, 1.0)]);
        // 1.5 away: inside 0.6 + 1.0.
        assert!(reg.is_blocked(Vec3::new(3.5, 100.0, 0.0), 0.6));
        assert!(!reg.is_blocked(Vec3::new(3.35, -50.0, 0.0), 0.6));
        assert!(!reg.is_blocked(Vec3::new(3.0, 0.0, 0.0), 0.6));
    }

    #[test]
    fn first_overlap_returns_earliest_registered() {
        let mut reg = CollisionRegistry::new();
        reg.register(vec![
            Solid::new(0.0, 0.0, 5.0),
            Solid::new(1.0, 0.0, 5.0),
        ]);
        let hit = reg.first_overlap(Vec3::new(0.5, 0.0, 0.0), 0.6).copied();
        assert_eq!(hit, Some(Solid::new(0.0, 0.0, 5.0)));
    }
}
